use super::{RemoteCaller, TransportError};
use crate::endpoint::{HttpMethod, Request, UserEndpoint};
use crate::ManagerConfig;
use ::utils::surf_logging::SurfLogging;
use ::utils::target_url::target_url;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::time::Duration;
use surf::http::Method;
use surf::{Client, RequestBuilder};

/// [`RemoteCaller`] backed by a surf HTTP client.
pub struct SurfRemoteCaller {
    http: Client,
    base_url: String,
    timeout: Duration,
    app_id: RwLock<String>,
    headers: RwLock<Vec<(String, String)>>,
}

impl SurfRemoteCaller {
    pub fn new(config: &ManagerConfig) -> Self {
        Self {
            http: Client::new().with(SurfLogging),
            base_url: config.base_url().clone(),
            timeout: config.request_timeout(),
            app_id: RwLock::new(String::new()),
            headers: RwLock::new(vec![]),
        }
    }

    fn build(&self, endpoint: &UserEndpoint) -> Result<surf::Request, TransportError> {
        let app_id = self.app_id.read().clone();
        let query = endpoint.query();
        let url = target_url(
            &self.base_url,
            &app_id,
            endpoint.version(),
            &endpoint.path(),
            query.iter().map(|(name, value)| (*name, value.as_str())),
        )?;

        let mut builder = RequestBuilder::new(method(endpoint.method()), url);
        for (name, value) in self.headers.read().iter() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = endpoint.body() {
            builder = builder
                .body_json(&body)
                .map_err(|err| TransportError::Http(err.to_string()))?;
        }

        Ok(builder.build())
    }

    async fn exchange(&self, request: surf::Request) -> Result<String, TransportError> {
        let mut response = self
            .http
            .send(request)
            .await
            .map_err(|err| TransportError::Http(err.to_string()))?;
        let body = response
            .body_string()
            .await
            .map_err(|err| TransportError::Http(err.to_string()))?;

        if !response.status().is_success() {
            return Err(TransportError::Status {
                status: response.status() as u16,
                body,
            });
        }

        Ok(body)
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::Get,
        HttpMethod::Post => Method::Post,
        HttpMethod::Put => Method::Put,
    }
}

#[async_trait]
impl RemoteCaller for SurfRemoteCaller {
    fn set_app_id(&self, app_id: &str) {
        *self.app_id.write() = app_id.to_string();
    }

    fn set_headers(&self, headers: Vec<(String, String)>) {
        *self.headers.write() = headers;
    }

    async fn request<R>(&self, request: Request<R>) -> Result<R, TransportError>
    where
        R: DeserializeOwned + Send + 'static,
    {
        let http_request = self.build(request.endpoint())?;
        let body = tokio::time::timeout(self.timeout, self.exchange(http_request))
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))??;

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UserCreationParams;

    fn caller() -> SurfRemoteCaller {
        let caller = SurfRemoteCaller::new(&ManagerConfig::default());
        caller.set_app_id("APP-1");
        caller.set_headers(vec![
            ("Api-Token".to_string(), "secret".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
        ]);
        caller
    }

    #[test]
    fn test_build_list_request() {
        let request = Request::get_users("neo one".to_string(), 100);
        let built = caller().build(request.endpoint()).unwrap();

        assert_eq!(built.method(), Method::Get);
        assert_eq!(
            built.url().as_str(),
            "https://api-app-1.sendbird.com/v3/users?limit=100&nickname=neo+one"
        );
        assert_eq!(built.header("Api-Token").unwrap().last().as_str(), "secret");
    }

    #[test]
    fn test_build_create_request() {
        let params = UserCreationParams::new("u1".to_string(), "neo".to_string(), None);
        let built = caller().build(Request::create_user(params).endpoint()).unwrap();

        assert_eq!(built.method(), Method::Post);
        assert_eq!(built.url().as_str(), "https://api-app-1.sendbird.com/v3/users");
        assert_eq!(built.header("Accept").unwrap().last().as_str(), "application/json");
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ManagerConfig::default().with_base_url("::nope::");
        let caller = SurfRemoteCaller::new(&config);
        let result = caller.build(Request::get_user("u1".to_string()).endpoint());

        assert!(matches!(result, Err(TransportError::Url(_))));
    }
}
