//! Defines the route handler for the page with the voucher print form.

use axum::{
    extract::Query,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

/// The query parameters accepted by the print form page.
#[derive(Debug, Default, Deserialize)]
pub struct PrintPageQuery {
    /// The search term of the listing being printed, carried into the form.
    pub q: Option<String>,
}

fn print_voucher_view(search_term: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::PRINT_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                method="get"
                action=(endpoints::VOUCHER_VIEW)
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Print Voucher" }

                div
                {
                    label
                        for="voucher_no"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Voucher No"
                    }

                    input
                        name="voucher_no"
                        id="voucher_no"
                        type="text"
                        placeholder="TOKO0825001"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label
                        for="expense_name"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Expense Name"
                    }

                    input
                        name="expense_name"
                        id="expense_name"
                        type="text"
                        placeholder="Expense Name"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div class="flex items-center gap-2"
                {
                    input
                        name="download"
                        id="download"
                        type="checkbox"
                        value="true";

                    label
                        for="download"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Download as a file"
                    }
                }

                input name="q" type="hidden" value=(search_term);

                button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    "Create Voucher"
                }
            }
        }
    };

    base("Print Voucher", &content)
}

/// Renders the page with the form for printing an expense voucher.
pub async fn get_print_voucher_page(Query(query): Query<PrintPageQuery>) -> Response {
    print_voucher_view(query.q.as_deref().unwrap_or_default()).into_response()
}

#[cfg(test)]
mod view_tests {
    use axum::extract::Query;

    use crate::{
        endpoints,
        test_utils::{
            assert_form_input, assert_form_input_with_value, assert_form_submit_button,
            assert_status_ok, assert_valid_html, must_get_form, parse_html_document,
        },
    };

    use super::{PrintPageQuery, get_print_voucher_page};

    #[tokio::test]
    async fn print_page_returns_form_targeting_the_voucher_route() {
        let response = get_print_voucher_page(Query(PrintPageQuery::default())).await;

        assert_status_ok(&response);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_eq!(form.value().attr("action"), Some(endpoints::VOUCHER_VIEW));
        assert_eq!(form.value().attr("method"), Some("get"));
        assert_form_input(&form, "voucher_no", "text");
        assert_form_input(&form, "expense_name", "text");
        assert_form_submit_button(&form);
    }

    #[tokio::test]
    async fn search_term_is_carried_in_a_hidden_input() {
        let query = PrintPageQuery {
            q: Some("cement".to_owned()),
        };

        let response = get_print_voucher_page(Query(query)).await;

        let document = parse_html_document(response).await;
        let form = must_get_form(&document);
        assert_form_input_with_value(&form, "q", "hidden", "cement");
    }
}
