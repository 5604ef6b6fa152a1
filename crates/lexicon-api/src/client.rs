use std::time::Duration;

use async_trait::async_trait;
use lexicon_types::{
    AllSuggestions, ApprovalOutcome, Credentials, ExistingWordSuggestion,
    ExistingWordSuggestionDraft, LikeOutcome, LoginGrant, NewVocabularyItem, NewWordSuggestion,
    NewWordSuggestionDraft, Registration, SuggestionKind, VocabularyItem,
};
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::wire::{
    Ack, CategoryLabels, CategoryPage, ItemPage, LoginResponse, RefreshRequest, RefreshResponse,
    RegisterRequest, RejectRequest, SavedIdsRequest, VocabularyListing,
};
use crate::{ApiError, ApiResult, LexiconApi};

/// reqwest-backed client for the lexicon REST backend
#[derive(Clone)]
pub struct HttpLexiconClient {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpLexiconClient {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        Ok(Self {
            base_url: parse_base(base_url)?,
            client: reqwest::Client::new(),
        })
    }

    /// Client whose requests give up after `timeout`
    pub fn with_timeout(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: parse_base(base_url)?,
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Join path segments onto the base url; a trailing `""` segment
    /// produces the trailing slash the backend routes expect
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get(&self, segments: &[&str]) -> ApiResult<RequestBuilder> {
        Ok(self.client.get(self.endpoint(segments)?))
    }

    fn post(&self, segments: &[&str]) -> ApiResult<RequestBuilder> {
        Ok(self.client.post(self.endpoint(segments)?))
    }

    /// Send a request and decode a 2xx JSON body, normalizing every failure
    async fn send<T>(&self, request: RequestBuilder) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!("{} {} failed", status.as_u16(), url.path());
            return Err(ApiError::from_response(status.as_u16(), &body));
        }

        tracing::debug!("{} {}", status.as_u16(), url.path());
        serde_json::from_str(&body)
            .map_err(|e| ApiError::Decode(format!("{}: {e}", url.path())))
    }

    async fn send_ack(&self, request: RequestBuilder) -> ApiResult<()> {
        let ack: Ack = self.send(request).await?;
        if !ack.message.is_empty() {
            tracing::debug!("Backend: {}", ack.message);
        }
        Ok(())
    }
}

fn parse_base(base_url: &str) -> ApiResult<Url> {
    let url = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(base_url.to_string()));
    }
    Ok(url)
}

fn bearer_header(token: &str) -> String {
    format!("Bearer {token}")
}

#[async_trait]
impl LexiconApi for HttpLexiconClient {
    async fn fetch_all_items(&self) -> ApiResult<Vec<VocabularyItem>> {
        let listing: VocabularyListing = self.send(self.get(&["vocabulary-items", ""])?).await?;
        Ok(listing.into_items())
    }

    async fn fetch_category(&self, category: &str) -> ApiResult<CategoryPage> {
        self.send(self.get(&["vocabulary-items", "category", category, ""])?)
            .await
    }

    async fn fetch_item(&self, id: &str) -> ApiResult<ItemPage> {
        self.send(self.get(&["vocabulary-items", id, ""])?).await
    }

    async fn fetch_category_labels(&self) -> ApiResult<Vec<String>> {
        let labels: CategoryLabels = self
            .send(self.get(&["vocabulary-items", "category", "all-category-labels"])?)
            .await?;
        Ok(labels.categories)
    }

    async fn search_items(
        &self,
        query: &str,
        language: Option<&str>,
    ) -> ApiResult<Vec<VocabularyItem>> {
        let request = self
            .get(&["search-vocabulary", ""])?
            .query(&[("q", query), ("lang", language.unwrap_or_default())]);
        self.send(request).await
    }

    async fn create_item(
        &self,
        bearer: &str,
        item: &NewVocabularyItem,
    ) -> ApiResult<VocabularyItem> {
        let request = self
            .post(&["save-vocabulary-item", ""])?
            .header("Authorization", bearer_header(bearer))
            .json(item);
        self.send(request).await
    }

    async fn fetch_saved_items(&self, bearer: &str) -> ApiResult<Vec<VocabularyItem>> {
        let request = self
            .get(&["saved-vocabulary-user", ""])?
            .header("Authorization", bearer_header(bearer));
        self.send(request).await
    }

    async fn save_items_for_user(&self, bearer: &str, ids: &[String]) -> ApiResult<()> {
        let request = self
            .post(&["save-vocabulary-items-user", ""])?
            .header("Authorization", bearer_header(bearer))
            .json(&SavedIdsRequest {
                vocabulary_ids: ids,
            });
        self.send_ack(request).await
    }

    async fn remove_saved_items(&self, bearer: &str, ids: &[String]) -> ApiResult<()> {
        let request = self
            .post(&["remove-saved-vocabulary-user", ""])?
            .header("Authorization", bearer_header(bearer))
            .json(&SavedIdsRequest {
                vocabulary_ids: ids,
            });
        self.send_ack(request).await
    }

    async fn register(&self, registration: &Registration) -> ApiResult<()> {
        let request = self
            .post(&["register", ""])?
            .json(&RegisterRequest { user: registration });
        let _profile: serde_json::Value = self.send(request).await?;
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> ApiResult<LoginGrant> {
        let request = self.post(&["login", ""])?.json(credentials);
        let response: LoginResponse = match self.send(request).await {
            Ok(response) => response,
            Err(ApiError::Unauthorized(_)) => {
                return Err(ApiError::Unauthorized(
                    "Unauthorized, check username and password".to_string(),
                ));
            }
            Err(e) => return Err(e),
        };
        response.into_grant()
    }

    async fn refresh_token(&self, refresh: &str) -> ApiResult<String> {
        let request = self
            .post(&["token", "refresh", ""])?
            .json(&RefreshRequest { refresh });
        let response: RefreshResponse = match self.send(request).await {
            Ok(response) => response,
            Err(ApiError::Unauthorized(_)) => {
                return Err(ApiError::Unauthorized(
                    "Refresh token expired or invalid.".to_string(),
                ));
            }
            Err(e) => return Err(e),
        };
        Ok(response.access)
    }

    async fn fetch_suggestions_for_item(
        &self,
        id: &str,
    ) -> ApiResult<Vec<ExistingWordSuggestion>> {
        self.send(self.get(&["get-suggestions-for-specific-word", id, ""])?)
            .await
    }

    async fn fetch_all_suggestions(&self) -> ApiResult<AllSuggestions> {
        self.send(self.get(&["get-suggestions-for-all-words", ""])?)
            .await
    }

    async fn submit_existing_suggestion(
        &self,
        bearer: &str,
        draft: &ExistingWordSuggestionDraft,
    ) -> ApiResult<ExistingWordSuggestion> {
        let request = self
            .post(&["save-suggestion-for-specific-word", ""])?
            .header("Authorization", bearer_header(bearer))
            .json(draft);
        self.send(request).await
    }

    async fn submit_new_word(
        &self,
        bearer: &str,
        draft: &NewWordSuggestionDraft,
    ) -> ApiResult<NewWordSuggestion> {
        let request = self
            .post(&["suggest-new-word", ""])?
            .header("Authorization", bearer_header(bearer))
            .json(draft);
        self.send(request).await
    }

    async fn like_suggestion(
        &self,
        bearer: &str,
        kind: SuggestionKind,
        id: &str,
    ) -> ApiResult<LikeOutcome> {
        let route = match kind {
            SuggestionKind::ExistingWord => "like-vocabulary-suggestion",
            SuggestionKind::NewWord => "like-new-word-suggestion",
        };
        let request = self
            .post(&[route, id, ""])?
            .header("Authorization", bearer_header(bearer));
        self.send(request).await
    }

    async fn approve_suggestion(
        &self,
        bearer: &str,
        kind: SuggestionKind,
        id: &str,
    ) -> ApiResult<ApprovalOutcome> {
        let route = match kind {
            SuggestionKind::ExistingWord => "approve-vocabulary-suggestion",
            SuggestionKind::NewWord => "approve-new-word-suggestion",
        };
        let request = self
            .post(&[route, id, ""])?
            .header("Authorization", bearer_header(bearer));
        self.send(request).await
    }

    async fn reject_suggestion(
        &self,
        bearer: &str,
        kind: SuggestionKind,
        id: &str,
    ) -> ApiResult<()> {
        let request = self
            .post(&["reject-suggestion", id, ""])?
            .header("Authorization", bearer_header(bearer))
            .json(&RejectRequest {
                suggestion_type: kind.wire_name(),
            });
        self.send_ack(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_keep_trailing_slash_and_escape_segments() {
        let client = HttpLexiconClient::new("http://127.0.0.1:8000").unwrap();
        let url = client
            .endpoint(&["vocabulary-items", "category", "heart lungs", ""])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8000/vocabulary-items/category/heart%20lungs/"
        );
    }

    #[test]
    fn base_path_prefix_is_preserved() {
        let client = HttpLexiconClient::new("http://example.org/api/").unwrap();
        let url = client.endpoint(&["login", ""]).unwrap();
        assert_eq!(url.as_str(), "http://example.org/api/login/");
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(matches!(
            HttpLexiconClient::new("mailto:someone@example.org"),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}
