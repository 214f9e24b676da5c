use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;

use crate::core::error::JobCardError;
use crate::core::job::{Job, JobId};
use crate::core::sync::JobLookup;

/// Dashboard REST backend: `GET <base>/jobs` and `GET <base>/jobs/<id>`.
pub struct HttpJobLookup {
    client: Client,
    base_url: String,
}

impl HttpJobLookup {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, JobCardError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| JobCardError::Lookup {
                target: base_url.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, JobCardError> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| JobCardError::Lookup {
                target: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(JobCardError::Status {
                target: url,
                status: status.as_u16(),
            });
        }

        response.json::<T>().map_err(|e| JobCardError::Decode {
            source_name: url,
            message: e.to_string(),
        })
    }
}

impl JobLookup for HttpJobLookup {
    fn fetch_job(&self, job_id: &JobId) -> Result<Job, JobCardError> {
        self.get(&format!("jobs/{job_id}"))
    }

    fn list_jobs(&self) -> Result<Vec<Job>, JobCardError> {
        self.get("jobs")
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    /// Serves one canned response and returns the request line it saw.
    fn serve_once(status: &str, body: &str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut header = String::new();
                reader.read_line(&mut header).unwrap();
                if header == "\r\n" || header.is_empty() {
                    break;
                }
            }
            let mut stream = stream;
            stream.write_all(response.as_bytes()).unwrap();
            request_line.trim().to_string()
        });
        (format!("http://{addr}/"), handle)
    }

    fn local_lookup(base: &str) -> HttpJobLookup {
        let client = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        HttpJobLookup::with_client(base, client)
    }

    #[test]
    fn fetches_job_by_id() {
        let (base, server) = serve_once(
            "200 OK",
            r#"{"jobID": 7, "jobName": "wc", "state": "COMPLETED", "numberOfWorkers": 2}"#,
        );
        let lookup = local_lookup(&base);

        let job = lookup.fetch_job(&JobId::Number(7)).unwrap();
        assert_eq!(job.state.as_deref(), Some("COMPLETED"));
        assert_eq!(server.join().unwrap(), "GET /jobs/7 HTTP/1.1");
    }

    #[test]
    fn lists_jobs() {
        let (base, server) = serve_once("200 OK", r#"[{"jobID": "a"}, {"jobID": "b"}]"#);
        let lookup = local_lookup(&base);

        let jobs = lookup.list_jobs().unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(server.join().unwrap(), "GET /jobs HTTP/1.1");
    }

    #[test]
    fn non_success_status_is_an_error() {
        let (base, server) = serve_once("404 Not Found", "{}");
        let lookup = local_lookup(&base);

        let err = lookup.fetch_job(&JobId::Number(5)).unwrap_err();
        assert!(matches!(err, JobCardError::Status { status: 404, .. }));
        server.join().unwrap();
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let (base, server) = serve_once("200 OK", r#"{"jobName": "no id"}"#);
        let lookup = local_lookup(&base);

        let err = lookup.fetch_job(&JobId::Number(1)).unwrap_err();
        assert!(matches!(err, JobCardError::Decode { .. }));
        server.join().unwrap();
    }
}
