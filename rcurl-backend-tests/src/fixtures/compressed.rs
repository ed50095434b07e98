#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use flate2::write::{GzEncoder, ZlibEncoder};
    use flate2::Compression;
    use http_body_util::Full;
    use hyper::body::Bytes;
    use hyper::Response;
    use rcurl::Curl;

    use crate::*;

    const PAYLOAD: &str = "the quick brown fox jumps over the lazy dog";

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn gzip_responses_are_transparently_inflated() {
        const PATH: &str = "compressed/gzip";
        add_fixture(PATH, |_| {
            Response::builder()
                .header("Content-Encoding", "gzip")
                .body(Full::new(Bytes::from(gzip(PAYLOAD.as_bytes()))))
                .unwrap()
        });

        let command = format!("curl --compressed {}", url_for(PATH));
        for (label, executor) in executors() {
            let response = Curl::from_command(&command)
                .unwrap()
                .exec_with(&*executor)
                .unwrap();
            assert_eq!(response.text(), PAYLOAD, "{label}");
            assert_eq!(response.header("content-encoding"), Some("gzip"), "{label}");
        }
    }

    #[test]
    fn deflate_responses_are_transparently_inflated() {
        const PATH: &str = "compressed/deflate";
        add_fixture(PATH, |_| {
            Response::builder()
                .header("Content-Encoding", "deflate")
                .body(Full::new(Bytes::from(deflate(PAYLOAD.as_bytes()))))
                .unwrap()
        });

        for (label, executor) in executors() {
            let response = Curl::new()
                .url(url_for(PATH))
                .exec_with(&*executor)
                .unwrap();
            assert_eq!(response.text(), PAYLOAD, "{label}");
        }
    }

    #[test]
    fn compressed_flag_advertises_accept_encoding() {
        const PATH: &str = "compressed/accept";
        add_fixture(PATH, dump_handler);

        let command = format!("curl --compressed {}", url_for(PATH));
        for (label, executor) in executors() {
            let response = Curl::from_command(&command)
                .unwrap()
                .exec_with(&*executor)
                .unwrap();
            let text = response.text().into_owned();
            assert!(
                text.contains("accept-encoding: gzip, deflate\n"),
                "{label}: {text}"
            );
        }
    }
}
