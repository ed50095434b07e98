#[cfg(test)]
mod tests {
    use http_body_util::Full;
    use hyper::body::Bytes;
    use hyper::Response;
    use rcurl::Curl;

    use crate::*;

    #[test]
    fn multi_value_response_headers_are_preserved() {
        const PATH: &str = "responses/set_cookie";
        add_fixture(PATH, |_| {
            Response::builder()
                .header("Set-Cookie", "cookie1=value1; Path=/")
                .header("Set-Cookie", "cookie2=value2; Path=/")
                .header("Set-Cookie", "cookie3=value3; Path=/")
                .body(Full::new(Bytes::from("ok")))
                .unwrap()
        });

        for (label, executor) in executors() {
            let response = Curl::new()
                .url(url_for(PATH))
                .exec_with(&*executor)
                .unwrap();
            let cookies = response.header_values("set-cookie");
            assert_eq!(cookies.len(), 3, "{label}: {cookies:?}");
            assert_eq!(cookies[0], "cookie1=value1; Path=/", "{label}");
            assert_eq!(cookies[2], "cookie3=value3; Path=/", "{label}");
            // Case-insensitive lookup finds the same list.
            assert_eq!(
                response.header_values("SET-COOKIE"),
                response.header_values("set-cookie"),
                "{label}"
            );
        }
    }

    #[test]
    fn error_statuses_are_responses_not_errors() {
        const PATH: &str = "responses/not_found";
        add_fixture(PATH, |_| {
            Response::builder()
                .status(404)
                .body(Full::new(Bytes::from("missing")))
                .unwrap()
        });

        for (label, executor) in executors() {
            let response = Curl::new()
                .url(url_for(PATH))
                .exec_with(&*executor)
                .unwrap();
            assert_eq!(response.status_code, 404, "{label}");
            assert!(!response.is_success(), "{label}");
            assert_eq!(response.status_message, "Not Found", "{label}");
            assert_eq!(response.text(), "missing", "{label}");
        }
    }

    #[test]
    fn response_text_decodes_the_body() {
        const PATH: &str = "responses/text";
        add_fixture(PATH, |_| {
            Response::builder()
                .header("Content-Type", "text/plain; charset=utf-8")
                .body(Full::new(Bytes::from("héllo wörld")))
                .unwrap()
        });

        for (label, executor) in executors() {
            let response = Curl::new()
                .url(url_for(PATH))
                .exec_with(&*executor)
                .unwrap();
            assert!(response.is_success(), "{label}");
            assert_eq!(response.text(), "héllo wörld", "{label}");
            assert_eq!(
                response.header("content-type"),
                Some("text/plain; charset=utf-8"),
                "{label}"
            );
        }
    }
}
