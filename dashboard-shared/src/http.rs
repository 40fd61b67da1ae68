//! Target-specific HTTP plumbing.
//!
//! In the browser requests go through `gloo-net` (fetch); native builds and
//! tests use `reqwest`. Both return the raw status and body so that response
//! interpretation lives in one place (`client.rs`).

use serde::Serialize;

use crate::client::ClientError;

/// Status code and body text of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(target_arch = "wasm32")]
mod imp {
    use super::*;
    use gloo_net::http::{Request, Response};

    impl From<gloo_net::Error> for ClientError {
        fn from(err: gloo_net::Error) -> Self {
            ClientError::Http(err.to_string())
        }
    }

    #[derive(Debug, Clone, Default)]
    pub(crate) struct HttpTransport;

    impl HttpTransport {
        pub async fn get(&self, url: &str) -> Result<HttpReply, ClientError> {
            let response = Request::get(url).send().await?;
            into_reply(response).await
        }

        pub async fn post_json<T: Serialize>(
            &self,
            url: &str,
            body: &T,
        ) -> Result<HttpReply, ClientError> {
            let response = Request::post(url)
                .json(body)
                .map_err(|e| ClientError::Parse(e.to_string()))?
                .send()
                .await?;
            into_reply(response).await
        }

        pub async fn post_query(
            &self,
            url: &str,
            params: &[(&'static str, String)],
        ) -> Result<HttpReply, ClientError> {
            let response = Request::post(url)
                .query(params.iter().map(|(k, v)| (*k, v.as_str())))
                .send()
                .await?;
            into_reply(response).await
        }
    }

    async fn into_reply(response: Response) -> Result<HttpReply, ClientError> {
        let status = response.status();
        let body = response.text().await?;
        Ok(HttpReply { status, body })
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use super::*;

    impl From<reqwest::Error> for ClientError {
        fn from(err: reqwest::Error) -> Self {
            ClientError::Http(err.to_string())
        }
    }

    #[derive(Debug, Clone, Default)]
    pub(crate) struct HttpTransport {
        client: reqwest::Client,
    }

    impl HttpTransport {
        pub async fn get(&self, url: &str) -> Result<HttpReply, ClientError> {
            let response = self.client.get(url).send().await?;
            into_reply(response).await
        }

        pub async fn post_json<T: Serialize>(
            &self,
            url: &str,
            body: &T,
        ) -> Result<HttpReply, ClientError> {
            let response = self.client.post(url).json(body).send().await?;
            into_reply(response).await
        }

        pub async fn post_query(
            &self,
            url: &str,
            params: &[(&'static str, String)],
        ) -> Result<HttpReply, ClientError> {
            let response = self.client.post(url).query(params).send().await?;
            into_reply(response).await
        }
    }

    async fn into_reply(response: reqwest::Response) -> Result<HttpReply, ClientError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpReply { status, body })
    }
}

pub(crate) use imp::HttpTransport;
