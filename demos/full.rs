use std::{net::SocketAddr, sync::Arc};

use axum::{
    response::Redirect,
    routing::{get, post},
    Extension, Form, Router,
};
use http::StatusCode;
use maud::{html, Markup};
use serde::Deserialize;
use tower_csrf_guard::{ActiveSession, Csrf, CsrfGuard, MemorySession, Mode};

#[derive(Deserialize)]
struct Submission {
    csrf_token: Option<String>,
    hotdogs: String,
}

#[tokio::main]
async fn main() {
    let mode = std::env::args()
        .nth(1)
        .map(|mode| mode.parse::<Mode>())
        .transpose()
        .unwrap()
        .unwrap_or_default();

    // A single shared session stands in for a real session layer.
    let session = ActiveSession::new(Arc::new(MemorySession::new("secret-session-identifier")));

    let app = Router::new()
        .route("/", get(root))
        .route("/submit", post(submit))
        .route("/rotate", get(rotate))
        .layer(CsrfGuard::new("secret-key").unwrap().mode(mode))
        .layer(Extension(session));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    axum::serve(listener, app.into_make_service())
        .await
        .unwrap();
}

async fn root(csrf: Csrf) -> Result<Markup, (StatusCode, String)> {
    let token = csrf
        .issue_token(false)
        .await
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;

    Ok(html! {
        link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";

        main class="container" {
            nav {
                ul {
                    li { strong { "Mode: " (csrf.mode().as_str()) } }
                    li { a href="/rotate" { "Rotate token" } }
                }
            }

            p { small { kbd { (token) } } }

            div class="grid" {
                form action="/submit" method="post" {
                    input type="hidden" name="csrf_token" value=(token);

                    label for="hotdogs" { "How do you like your hotdogs?" }

                    select name="hotdogs" {
                        option value="ketchup" { "Ketchup" }
                        option value="more-ketchup" { "More ketchup" }
                    }

                    button type="submit" { "Submit with token" }
                }

                form action="/submit" method="post" {
                    label for="hotdogs" { "How do you like your hotdogs?" }

                    select name="hotdogs" {
                        option value="still-ketchup" { "Still ketchup" }
                        option value="always-ketchup" { "It'll always be ketchup!" }
                    }

                    button type="submit" { "Submit without token" }
                }
            }
        }
    })
}

async fn submit(
    csrf: Csrf,
    Form(submission): Form<Submission>,
) -> Result<(StatusCode, String), (StatusCode, String)> {
    let valid = csrf
        .check_token_with(submission.csrf_token.as_deref())
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;

    if valid {
        Ok((StatusCode::OK, format!("Token is valid. {}!", submission.hotdogs)))
    } else {
        Ok((StatusCode::FORBIDDEN, "Token is NOT valid.".into()))
    }
}

async fn rotate(csrf: Csrf) -> Result<Redirect, (StatusCode, String)> {
    csrf.issue_token(true)
        .await
        .map_err(|err| (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()))?;

    Ok(Redirect::to("/"))
}
