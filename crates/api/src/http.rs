use std::env;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};

use edunex_core::model::{AnswerSheet, Quiz, QuizId, UserId};

use crate::client::{ApiError, AssessmentApi, QuizOverview};
use crate::wire::{
    AuthResponseDto, LoginRequestDto, QuizDto, QuizOverviewDto, SubmitAnswerDto,
};

/// Connection settings for the EduNex REST API.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Reads `EDUNEX_API_URL` and `EDUNEX_API_TOKEN` from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var("EDUNEX_API_URL").unwrap_or_else(|_| "http://localhost:8080/api".into());
        let token = env::var("EDUNEX_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        Self { base_url, token }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Authenticated identity returned by the login endpoint.
#[derive(Clone, Debug)]
pub struct AuthSession {
    pub token: String,
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<String>,
}

/// `reqwest`-backed assessment API client.
///
/// Attaches the bearer credential to every call; a 401-class response maps to
/// [`ApiError::Unauthorized`] and is never retried here.
#[derive(Clone)]
pub struct HttpAssessmentApi {
    client: Client,
    config: ApiConfig,
}

impl HttpAssessmentApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Authenticate and store the returned bearer token for later calls.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for rejected credentials and
    /// `ApiError::Network` for transport failures.
    pub async fn login(
        &mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<AuthSession, ApiError> {
        let payload = LoginRequestDto {
            username: username.into(),
            password: password.into(),
        };

        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&payload)
            .send()
            .await?;
        let response = check_status(response)?;

        let body: AuthResponseDto = response.json().await?;
        tracing::info!(username = %payload.username, "login succeeded");
        self.config.token = Some(body.token.clone());

        Ok(AuthSession {
            token: body.token,
            user_id: body.id.map(UserId::new),
            username: body.username,
            full_name: body.full_name,
            role: body.role,
        })
    }
}

fn check_status(response: Response) -> Result<Response, ApiError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized),
        status => Err(ApiError::UnexpectedStatus(status)),
    }
}

#[async_trait]
impl AssessmentApi for HttpAssessmentApi {
    async fn fetch_quiz(&self, quiz_id: QuizId) -> Result<Quiz, ApiError> {
        let request = self.authorized(self.client.get(self.url(&format!("/quizzes/{quiz_id}"))));
        let response = check_status(request.send().await?)?;

        let dto: QuizDto = response.json().await?;
        let quiz = dto.into_quiz()?;
        tracing::debug!(quiz_id = %quiz_id, questions = quiz.question_count(), "quiz fetched");
        Ok(quiz)
    }

    async fn submit_attempt(
        &self,
        quiz_id: QuizId,
        answers: &AnswerSheet,
    ) -> Result<(), ApiError> {
        let payload: Vec<SubmitAnswerDto> = answers
            .entries()
            .iter()
            .map(|entry| SubmitAnswerDto {
                question_id: entry.question_id().value(),
                answer: entry.answer().to_owned(),
            })
            .collect();

        let request = self.authorized(
            self.client
                .post(self.url(&format!("/quizzes/{quiz_id}/submit")))
                .json(&payload),
        );
        check_status(request.send().await?)?;
        tracing::info!(quiz_id = %quiz_id, answers = payload.len(), "attempt submitted");
        Ok(())
    }

    async fn student_quizzes(&self, student_id: UserId) -> Result<Vec<QuizOverview>, ApiError> {
        let request = self.authorized(
            self.client
                .get(self.url(&format!("/quizzes/student/{student_id}"))),
        );
        let response = check_status(request.send().await?)?;

        let listing: Vec<QuizOverviewDto> = response.json().await?;
        Ok(listing.into_iter().map(QuizOverviewDto::into_overview).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let api = HttpAssessmentApi::new(ApiConfig::new("http://localhost:8080/api/"));
        assert_eq!(
            api.url("/quizzes/3"),
            "http://localhost:8080/api/quizzes/3"
        );
    }

    #[test]
    fn config_with_token_overrides() {
        let config = ApiConfig::new("http://x").with_token("abc");
        assert_eq!(config.token.as_deref(), Some("abc"));
    }
}
