#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use http_body_util::Full;
    use hyper::body::Bytes;
    use hyper::Response;
    use rcurl::{Curl, Error};

    use crate::*;

    // Accepts and immediately drops every connection, counting them; the
    // client sees a transport failure on each attempt.
    fn accept_and_drop_listener(counter: Arc<AtomicUsize>) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                counter.fetch_add(1, Ordering::SeqCst);
                drop(stream);
            }
        });
        port
    }

    #[test]
    fn retry_exhaustion_makes_exactly_max_retries_plus_one_attempts() {
        for (label, executor) in executors() {
            let counter = Arc::new(AtomicUsize::new(0));
            let port = accept_and_drop_listener(Arc::clone(&counter));
            let result = Curl::new()
                .url(format!("http://127.0.0.1:{port}/"))
                .retry(2)
                .retry_delay(Duration::ZERO)
                .exec_with(&*executor);
            match result {
                Err(Error::RetriesExhausted { attempts, source }) => {
                    assert_eq!(attempts, 3, "{label}");
                    assert!(matches!(*source, Error::Io(_)), "{label}: {source}");
                }
                other => panic!("{label}: unexpected result: {other:?}"),
            }
            assert_eq!(counter.load(Ordering::SeqCst), 3, "{label}");
        }
    }

    #[test]
    fn connection_refused_without_retries_reports_one_attempt() {
        // Bind then drop to obtain a port with no listener.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        for (label, executor) in executors() {
            let result = Curl::new()
                .url(format!("http://127.0.0.1:{port}/"))
                .retry_delay(Duration::ZERO)
                .exec_with(&*executor);
            match result {
                Err(Error::RetriesExhausted { attempts, .. }) => {
                    assert_eq!(attempts, 1, "{label}")
                }
                other => panic!("{label}: unexpected result: {other:?}"),
            }
        }
    }

    #[test]
    fn http_error_statuses_are_not_retried() {
        const PATH: &str = "retry/server_error";
        static HITS: AtomicUsize = AtomicUsize::new(0);
        add_fixture(PATH, |_| {
            HITS.fetch_add(1, Ordering::SeqCst);
            Response::builder()
                .status(500)
                .body(Full::new(Bytes::from("boom")))
                .unwrap()
        });

        for (label, executor) in executors() {
            let before = HITS.load(Ordering::SeqCst);
            let response = Curl::new()
                .url(url_for(PATH))
                .retry(3)
                .retry_delay(Duration::ZERO)
                .exec_with(&*executor)
                .unwrap();
            assert_eq!(response.status_code, 500, "{label}");
            assert_eq!(HITS.load(Ordering::SeqCst), before + 1, "{label}");
        }
    }

    #[test]
    fn a_recovering_endpoint_succeeds_within_the_budget() {
        // First connection dropped, then a healthy response: one retry is
        // enough.
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        std::thread::spawn(move || {
            use std::io::{Read as _, Write as _};
            // Drop the first connection outright.
            if let Ok((stream, _)) = listener.accept() {
                drop(stream);
            }
            // Serve a minimal valid response on the second.
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
                );
            }
        });

        let response = Curl::new()
            .url(format!("http://127.0.0.1:{port}/"))
            .retry(1)
            .retry_delay(Duration::ZERO)
            .exec_with(&rcurl_backend_ureq::UreqExecutor::new())
            .unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(response.text(), "ok");
    }
}
