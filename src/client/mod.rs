//! HTTP consumer of the data service REST contract.

use std::marker::PhantomData;

use agenda_core::models::{Entity, InputOf};
use agenda_core::service::{decode_list, decode_record, DataService, ServiceError};
use reqwest::{Client, Response, Url};

use crate::config::Config;

/// [`DataService`] for one collection (`/notes`, `/meetings`) of a REST server.
#[derive(Debug, Clone)]
pub struct HttpDataService<R> {
    http: Client,
    base_url: Url,
    _record: PhantomData<fn() -> R>,
}

impl<R: Entity> HttpDataService<R> {
    pub fn new(config: &Config) -> Result<Self, ServiceError> {
        let http = config.http_client().map_err(transport)?;
        Ok(Self::with_client(http, config.base_url.clone()))
    }

    pub fn with_client(http: Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            _record: PhantomData,
        }
    }

    /// `<base>/<collection>[/<id>]`, with the id escaped as one path segment.
    pub fn endpoint(&self, id: Option<&str>) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ServiceError::Transport(format!("{} cannot be a base URL", self.base_url))
            })?;
            segments.pop_if_empty().push(R::COLLECTION);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }
}

fn transport(e: reqwest::Error) -> ServiceError {
    ServiceError::Transport(e.to_string())
}

fn check_status(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ServiceError::Status(status.as_u16()))
    }
}

async fn record_body<R: Entity>(response: Response) -> Result<Option<R>, ServiceError> {
    let body = check_status(response)?.bytes().await.map_err(transport)?;
    Ok(decode_record(&body))
}

impl<R: Entity> DataService<R> for HttpDataService<R> {
    async fn list(&self) -> Result<Vec<R>, ServiceError> {
        let url = self.endpoint(None)?;
        tracing::debug!("GET {}", url);

        let response = self.http.get(url).send().await.map_err(transport)?;
        let body = check_status(response)?.bytes().await.map_err(transport)?;
        Ok(decode_list(&body))
    }

    async fn create(&self, input: &InputOf<R>) -> Result<Option<R>, ServiceError> {
        let url = self.endpoint(None)?;
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(url)
            .json(input)
            .send()
            .await
            .map_err(transport)?;
        record_body(response).await
    }

    async fn update(&self, id: &str, input: &InputOf<R>) -> Result<Option<R>, ServiceError> {
        let url = self.endpoint(Some(id))?;
        tracing::debug!("PUT {}", url);

        let response = self
            .http
            .put(url)
            .json(input)
            .send()
            .await
            .map_err(transport)?;
        record_body(response).await
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let url = self.endpoint(Some(id))?;
        tracing::debug!("DELETE {}", url);

        let response = self.http.delete(url).send().await.map_err(transport)?;
        check_status(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agenda_core::models::{Meeting, Note};

    fn service<R: Entity>(base: &str) -> HttpDataService<R> {
        HttpDataService::with_client(Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn endpoints_append_to_the_base_path() {
        let notes = service::<Note>("http://localhost:3000");
        assert_eq!(
            notes.endpoint(None).unwrap().as_str(),
            "http://localhost:3000/notes"
        );

        let meetings = service::<Meeting>("http://example.com/api/");
        assert_eq!(
            meetings.endpoint(Some("42")).unwrap().as_str(),
            "http://example.com/api/meetings/42"
        );
    }

    #[test]
    fn ids_are_escaped() {
        let notes = service::<Note>("http://localhost:3000");
        assert_eq!(
            notes.endpoint(Some("a/b c")).unwrap().as_str(),
            "http://localhost:3000/notes/a%2Fb%20c"
        );
    }
}
