use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{DatabaseConnection, EntityTrait};

use std::sync::Arc;

use crate::{analytics, budgets, goals, receipts, transactions, user};
use engine::Engine;
use providers::{AdviceClient, OcrClient, RatesClient};

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
    pub ocr: OcrClient,
    pub rates: RatesClient,
    pub advice: AdviceClient,
}

/// External collaborator clients, injected at construction.
#[derive(Clone)]
pub struct Collaborators {
    pub ocr: OcrClient,
    pub rates: RatesClient,
    pub advice: AdviceClient,
}

async fn auth(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(auth_header) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find_by_id(auth_header.username())
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user = match user {
        Some(user) if user.password == auth_header.password() => user,
        _ => return Err(StatusCode::UNAUTHORIZED),
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route(
            "/transactions",
            post(transactions::create).get(transactions::list),
        )
        .route("/transactions/upcoming", get(transactions::upcoming))
        .route(
            "/transactions/{id}",
            get(transactions::get_one)
                .patch(transactions::update)
                .delete(transactions::delete),
        )
        .route("/budgets", post(budgets::create).get(budgets::list))
        .route("/budgets/period", get(budgets::list_for_period))
        .route(
            "/budgets/{id}",
            get(budgets::get_one)
                .patch(budgets::update)
                .delete(budgets::delete),
        )
        .route("/goals", post(goals::create).get(goals::list))
        .route(
            "/goals/{id}",
            get(goals::get_one).patch(goals::update).delete(goals::delete),
        )
        .route("/goals/{id}/contribute", post(goals::contribute))
        .route("/receipts", post(receipts::upload).get(receipts::list))
        .route("/receipts/{id}", get(receipts::get_one))
        .route("/analytics/advice", post(analytics::advice))
        .route("/analytics/spending", post(analytics::analyze_spending))
        .route("/analytics/convert", get(analytics::convert))
        .route("/analytics/rates", get(analytics::rates))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection, collaborators: Collaborators) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, collaborators, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    collaborators: Collaborators,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
        ocr: collaborators.ocr,
        rates: collaborators.rates,
        advice: collaborators.advice,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    collaborators: Collaborators,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, collaborators, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
