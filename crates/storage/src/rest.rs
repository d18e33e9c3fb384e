//! REST
//!
//! Client for the hosted backend: a PostgREST interface under `/rest/v1` for the data tables and
//! an auth interface under `/auth/v1` for password sessions. The access token of the current
//! session is kept by a `SessionStore`, so that it survives page reloads.

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use gloo_net::http::Request;
use log::debug;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use strum::AsRefStr;
use treino_domain as domain;
use treino_web_app::Config;
use uuid::Uuid;

/// Postgres error code of a unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

pub trait SessionStore {
    fn read_token(&self) -> Option<String>;
    /// Stores the token, or removes it if `None` is given.
    fn write_token(&self, token: Option<&str>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[allow(async_fn_in_trait)]
pub trait SendRequest {
    async fn send_request(&self, request: HttpRequest) -> Result<HttpResponse, RestError>;
}

#[derive(Clone, Copy, Default)]
pub struct GlooNetSendRequest;

impl SendRequest for GlooNetSendRequest {
    async fn send_request(&self, request: HttpRequest) -> Result<HttpResponse, RestError> {
        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        let request = match request.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|err| anyhow!("failed to build request: {err}"))?;

        let response = request.send().await.map_err(|_| RestError::NoConnection)?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| anyhow!("failed to read response: {err}"))?;

        Ok(HttpResponse { status, body })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RestError {
    #[error("no connection")]
    NoConnection,
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("conflict")]
    Conflict,
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Data(#[from] domain::DataError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RestError {
    fn from_response(response: &HttpResponse) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            code: Option<String>,
        }

        let code = serde_json::from_str::<ErrorBody>(&response.body)
            .ok()
            .and_then(|body| body.code);

        match (response.status, code.as_deref()) {
            (409, _) | (_, Some(UNIQUE_VIOLATION)) => Self::Conflict,
            (401 | 403, _) => Self::Unauthorized,
            (404, _) => Self::NotFound,
            (status, _) => Self::Status(status),
        }
    }
}

impl From<RestError> for domain::ReadError {
    fn from(value: RestError) -> Self {
        match value {
            RestError::NoConnection => domain::StorageError::NoConnection.into(),
            RestError::Unauthorized => domain::StorageError::NoSession.into(),
            RestError::NotFound => domain::ReadError::NotFound,
            RestError::Data(err) => domain::ReadError::Data(err),
            err => domain::ReadError::Other(Box::new(err)),
        }
    }
}

impl From<RestError> for domain::CreateError {
    fn from(value: RestError) -> Self {
        match value {
            RestError::NoConnection => domain::StorageError::NoConnection.into(),
            RestError::Unauthorized => domain::StorageError::NoSession.into(),
            RestError::Conflict => domain::CreateError::Conflict,
            err => domain::CreateError::Other(Box::new(err)),
        }
    }
}

impl From<RestError> for domain::DeleteError {
    fn from(value: RestError) -> Self {
        match value {
            RestError::NoConnection => domain::StorageError::NoConnection.into(),
            RestError::Unauthorized => domain::StorageError::NoSession.into(),
            err => domain::DeleteError::Other(Box::new(err)),
        }
    }
}

#[derive(AsRefStr, Debug, Clone, Copy)]
enum Table {
    #[strum(serialize = "treinos")]
    Workouts,
    #[strum(serialize = "grupos_musculares")]
    MuscleGroups,
    #[strum(serialize = "profiles")]
    Profiles,
}

#[derive(Clone)]
pub struct REST<S: SendRequest, T: SessionStore> {
    config: Config,
    sender: S,
    session: T,
}

impl<T: SessionStore> REST<GlooNetSendRequest, T> {
    #[must_use]
    pub fn new(config: Config, session: T) -> Self {
        Self::with_sender(config, GlooNetSendRequest, session)
    }
}

impl<S: SendRequest, T: SessionStore> REST<S, T> {
    #[must_use]
    pub fn with_sender(config: Config, sender: S, session: T) -> Self {
        Self {
            config,
            sender,
            session,
        }
    }

    fn table_url(&self, table: Table, query: &str) -> String {
        format!("{}/rest/v1/{}{query}", self.config.backend_url, table.as_ref())
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.config.backend_url)
    }

    /// Builds a request authorized by the current session, or by the API key if there is none.
    fn request(&self, method: Method, url: String, body: Option<String>) -> HttpRequest {
        let token = self
            .session
            .read_token()
            .unwrap_or_else(|| self.config.api_key.clone());
        self.request_with_token(method, url, body, &token)
    }

    fn request_with_token(
        &self,
        method: Method,
        url: String,
        body: Option<String>,
        token: &str,
    ) -> HttpRequest {
        let mut headers = vec![
            ("apikey".to_string(), self.config.api_key.clone()),
            ("Authorization".to_string(), format!("Bearer {token}")),
        ];
        if body.is_some() {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RestError> {
        let url = request.url.clone();
        let response = self.sender.send_request(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            debug!("request to {url} failed with status {}", response.status);
            Err(RestError::from_response(&response))
        }
    }

    async fn fetch<D: DeserializeOwned>(&self, request: HttpRequest) -> Result<D, RestError> {
        let response = self.send(request).await?;
        Ok(serde_json::from_str(&response.body)?)
    }

    async fn insert<D: DeserializeOwned>(
        &self,
        table: Table,
        row: &impl Serialize,
    ) -> Result<D, RestError> {
        let mut request = self.request(
            Method::Post,
            self.table_url(table, ""),
            Some(serde_json::to_string(&[row])?),
        );
        request
            .headers
            .push(("Prefer".to_string(), "return=representation".to_string()));

        let mut rows: Vec<D> = self.fetch(request).await?;
        if rows.is_empty() {
            return Err(anyhow!("no row returned by insert into {}", table.as_ref()).into());
        }
        Ok(rows.swap_remove(0))
    }
}

impl<S: SendRequest, T: SessionStore> domain::SessionRepository for REST<S, T> {
    async fn request_session(
        &self,
        credentials: domain::Credentials,
    ) -> Result<domain::User, domain::ReadError> {
        let body = serde_json::to_string(&PasswordGrant {
            email: &credentials.email,
            password: &credentials.password,
        })
        .map_err(RestError::from)?;
        let request = self.request_with_token(
            Method::Post,
            self.auth_url("token?grant_type=password"),
            Some(body),
            &self.config.api_key,
        );

        let response = match self.fetch::<TokenResponse>(request).await {
            Err(RestError::Status(400)) => Err(RestError::Unauthorized),
            result => result,
        }?;
        self.session.write_token(Some(&response.access_token));

        Ok(response.user.into())
    }

    async fn initialize_session(&self) -> Result<domain::User, domain::ReadError> {
        let Some(token) = self.session.read_token() else {
            return Err(domain::StorageError::NoSession.into());
        };

        let request = self.request_with_token(Method::Get, self.auth_url("user"), None, &token);
        match self.fetch::<AuthUser>(request).await {
            Ok(user) => Ok(user.into()),
            Err(RestError::Unauthorized) => {
                self.session.write_token(None);
                Err(domain::StorageError::NoSession.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_session(&self) -> Result<(), domain::DeleteError> {
        let Some(token) = self.session.read_token() else {
            return Ok(());
        };

        let request = self.request_with_token(Method::Post, self.auth_url("logout"), None, &token);
        let result = self.send(request).await;
        self.session.write_token(None);

        match result {
            Ok(_) | Err(RestError::Unauthorized) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn read_admin_status(&self, user_id: domain::UserID) -> Result<bool, domain::ReadError> {
        let request = self.request(
            Method::Get,
            self.table_url(Table::Profiles, &format!("?select=is_admin&id=eq.{}", *user_id)),
            None,
        );
        let rows: Vec<ProfileRow> = self.fetch(request).await?;

        match rows.as_slice() {
            [row] => Ok(row.is_admin.unwrap_or(false)),
            [] => Err(domain::ReadError::NotFound),
            _ => Err(RestError::from(anyhow!("multiple profiles for user {}", *user_id)).into()),
        }
    }
}

impl<S: SendRequest, T: SessionStore> domain::WorkoutRepository for REST<S, T> {
    async fn read_workout_records(&self) -> Result<Vec<domain::WorkoutRecord>, domain::ReadError> {
        let request = self.request(
            Method::Get,
            self.table_url(Table::Workouts, "?select=*&order=created_at.desc"),
            None,
        );
        let rows: Vec<WorkoutRow> = self.fetch(request).await?;

        Ok(rows
            .into_iter()
            .map(domain::WorkoutRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn create_workout_record(
        &self,
        category: domain::CategoryCode,
        week: String,
        day: String,
        name: domain::Name,
        exercises: Vec<domain::ExerciseEntry>,
    ) -> Result<domain::WorkoutRecord, domain::CreateError> {
        let row: WorkoutRow = self
            .insert(
                Table::Workouts,
                &NewWorkoutRow {
                    nome: name.into(),
                    categoria: category.id(),
                    semana: week,
                    dia: day,
                    exercicios: exercises.iter().map(ExerciseRow::from).collect(),
                },
            )
            .await?;

        domain::WorkoutRecord::try_from(row)
            .map_err(|err| domain::CreateError::Other(Box::new(err)))
    }
}

impl<S: SendRequest, T: SessionStore> domain::MuscleGroupRepository for REST<S, T> {
    async fn read_muscle_groups(&self) -> Result<Vec<domain::MuscleGroup>, domain::ReadError> {
        let request = self.request(
            Method::Get,
            self.table_url(Table::MuscleGroups, "?select=*&order=nome.asc"),
            None,
        );
        let rows: Vec<MuscleGroupRow> = self.fetch(request).await?;

        rows.into_iter()
            .map(|row| {
                domain::MuscleGroup::try_from(row)
                    .map_err(|err| domain::ReadError::Other(Box::new(err)))
            })
            .collect()
    }

    async fn create_muscle_group(
        &self,
        name: domain::Name,
    ) -> Result<domain::MuscleGroup, domain::CreateError> {
        let row: MuscleGroupRow = self
            .insert(Table::MuscleGroups, &NewMuscleGroupRow { nome: name.as_ref() })
            .await?;

        domain::MuscleGroup::try_from(row).map_err(|err| domain::CreateError::Other(Box::new(err)))
    }
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize, Debug)]
struct TokenResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Deserialize, Debug)]
struct AuthUser {
    id: Uuid,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Deserialize, Debug, Default)]
struct UserMetadata {
    #[serde(default)]
    role: Option<String>,
}

impl From<AuthUser> for domain::User {
    fn from(value: AuthUser) -> Self {
        domain::User::new(
            value.id.into(),
            value.email.as_deref().unwrap_or_default(),
            value.user_metadata.role.as_deref(),
        )
    }
}

#[derive(Deserialize, Debug)]
struct ProfileRow {
    is_admin: Option<bool>,
}

#[derive(Deserialize, Debug)]
struct WorkoutRow {
    id: Value,
    #[serde(default)]
    nome: Option<String>,
    categoria: String,
    semana: String,
    dia: String,
    #[serde(default)]
    exercicios: Option<Vec<ExerciseRow>>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl TryFrom<WorkoutRow> for domain::WorkoutRecord {
    type Error = domain::DataError;

    fn try_from(value: WorkoutRow) -> Result<Self, Self::Error> {
        Ok(domain::WorkoutRecord {
            id: text(value.id).unwrap_or_default().into(),
            category: domain::CategoryCode::try_from(value.categoria.as_str())?,
            week: value.semana,
            day: value.dia,
            name: value.nome.unwrap_or_default(),
            exercises: value
                .exercicios
                .unwrap_or_default()
                .into_iter()
                .map(domain::ExerciseEntry::from)
                .collect(),
            created_at: value.created_at,
        })
    }
}

#[derive(Serialize)]
struct NewWorkoutRow {
    nome: String,
    categoria: &'static str,
    semana: String,
    dia: String,
    exercicios: Vec<ExerciseRow>,
}

/// An exercise inside the `exercicios` column. Rows written by different editors use either
/// English or Portuguese keys, and `repeticoes` may be a string or a number.
#[derive(Serialize, Deserialize, Debug, Default)]
struct ExerciseRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(default, alias = "nome")]
    name: Option<String>,
    #[serde(default, alias = "reps")]
    repeticoes: Option<Value>,
    #[serde(default, alias = "observacoes", skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(default, alias = "imagem", skip_serializing_if = "Option::is_none")]
    image: Option<String>,
}

impl From<ExerciseRow> for domain::ExerciseEntry {
    fn from(value: ExerciseRow) -> Self {
        domain::ExerciseEntry {
            id: value.id.and_then(text),
            name: value.name.unwrap_or_default(),
            repetitions: value.repeticoes.and_then(text).unwrap_or_default(),
            notes: value.notes,
            image: value.image,
        }
    }
}

impl From<&domain::ExerciseEntry> for ExerciseRow {
    fn from(value: &domain::ExerciseEntry) -> Self {
        ExerciseRow {
            id: value.id.clone().map(Value::String),
            name: Some(value.name.clone()),
            repeticoes: Some(Value::String(value.repetitions.clone())),
            notes: value.notes.clone(),
            image: value.image.clone(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct MuscleGroupRow {
    id: Value,
    nome: String,
}

#[derive(Serialize)]
struct NewMuscleGroupRow<'a> {
    nome: &'a str,
}

impl TryFrom<MuscleGroupRow> for domain::MuscleGroup {
    type Error = domain::NameError;

    fn try_from(value: MuscleGroupRow) -> Result<Self, Self::Error> {
        Ok(domain::MuscleGroup {
            id: text(value.id).unwrap_or_default().into(),
            name: domain::Name::new(&value.nome)?,
        })
    }
}

/// Textual form of a loosely typed JSON value, `None` for null.
fn text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        value => Some(value.to_string()),
    }
}
