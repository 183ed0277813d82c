use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::{Form, Router};
use common::message::{Command, LightingCommand, Rgb};
use serde::Deserialize;
use tower_http::services::ServeDir;

use crate::error::ApiError;
use crate::messages::CommandSender;

const CONTROL_PAGE: &str = include_str!("../templates/control.html");

#[derive(Clone)]
pub struct AppState {
    pub sender: Arc<CommandSender>,
}

/// Fields posted by the control page's pattern form
#[derive(Debug, Deserialize)]
pub struct SendForm {
    pub pattern: i64,
    pub primary_r: u8,
    pub primary_g: u8,
    pub primary_b: u8,
    pub secondary_r: u8,
    pub secondary_g: u8,
    pub secondary_b: u8,
    pub bpm: i64,
    pub flags: i64,
}

impl From<SendForm> for LightingCommand {
    fn from(form: SendForm) -> Self {
        Self {
            pattern: form.pattern,
            primary: Rgb::new(form.primary_r, form.primary_g, form.primary_b),
            secondary: Rgb::new(form.secondary_r, form.secondary_g, form.secondary_b),
            bpm: form.bpm,
            flags: form.flags,
        }
    }
}

pub fn create_app(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(control_panel))
        .route("/send", post(send))
        .route("/dark", post(go_dark))
        .route("/rssi", post(request_rssi))
        .route("/sleep", post(send_sleep))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

async fn control_panel() -> Html<&'static str> {
    Html(CONTROL_PAGE)
}

async fn send(
    State(state): State<AppState>,
    Form(form): Form<SendForm>,
) -> Result<Redirect, ApiError> {
    dispatch(&state, Command::Set(form.into()))
}

async fn go_dark(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    dispatch(&state, Command::Dark)
}

async fn request_rssi(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    dispatch(&state, Command::Rssi)
}

async fn send_sleep(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    dispatch(&state, Command::Sleep)
}

/// Send the command and bounce the browser back to the control page
fn dispatch(state: &AppState, command: Command) -> Result<Redirect, ApiError> {
    state.sender.send(&command)?;
    Ok(Redirect::to("/"))
}
