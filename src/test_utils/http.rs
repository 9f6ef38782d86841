use axum::{body::Body, http::StatusCode, response::Response};

#[track_caller]
pub(crate) fn assert_status_ok(response: &Response<Body>) {
    assert_eq!(
        response.status(),
        StatusCode::OK,
        "want status 200 OK, got {}",
        response.status()
    );
}

#[track_caller]
pub(crate) fn assert_content_type(response: &Response<Body>, want: &str) {
    let got = get_header(response, "content-type");

    assert_eq!(got, want, "want content-type \"{want}\", got \"{got}\"");
}

#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    response
        .headers()
        .get(header_name)
        .unwrap_or_else(|| panic!("response is missing the {header_name} header"))
        .to_str()
        .unwrap_or_else(|error| panic!("the {header_name} header is not valid UTF-8: {error}"))
        .to_owned()
}

#[track_caller]
pub(crate) fn assert_hx_redirect(response: &Response<Body>, endpoint: &str) {
    let got = get_header(response, "hx-redirect");

    assert_eq!(got, endpoint, "want redirect to {endpoint}, got {got}");
}
