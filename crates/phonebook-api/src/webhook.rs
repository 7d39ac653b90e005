//! Handler for `POST /accept_webhook`.
//!
//! | `payload_type`   | Effect                            | Unknown id |
//! |------------------|-----------------------------------|------------|
//! | `PersonAdded`    | insert, or overwrite the name     | n/a        |
//! | `PersonRenamed`  | update the name                   | 404        |
//! | `PersonRemoved`  | delete the row                    | 404        |

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use phonebook_core::{
  person::{Person, PersonEvent, WebhookPayload},
  store::{PersonStore, QueryExecutor},
};
use phonebook_nlq::CompletionClient;
use serde::Serialize;

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct WebhookAccepted {
  pub detail: &'static str,
}

/// `POST /accept_webhook`, body: `{"payload_type": ..., "payload_content": {...}}`
pub async fn accept<S, C>(
  State(state): State<AppState<S, C>>,
  body: Result<Json<WebhookPayload>, JsonRejection>,
) -> Result<Json<WebhookAccepted>, ApiError>
where
  S: PersonStore + QueryExecutor + 'static,
  C: CompletionClient + 'static,
{
  let Json(payload) = body.map_err(|e| {
    tracing::debug!(error = %e, "rejected webhook body");
    ApiError::invalid_input()
  })?;

  let event = PersonEvent::from_payload(payload).map_err(|e| {
    tracing::debug!(error = %e, "rejected webhook payload");
    ApiError::invalid_input()
  })?;

  tracing::info!(
    payload_type = event.payload_type(),
    person_id = %event.person_id(),
    timestamp = %event.timestamp(),
    "applying webhook event",
  );

  apply(state.store.as_ref(), event).await?;

  Ok(Json(WebhookAccepted { detail: "Webhook processed successfully" }))
}

async fn apply<S: PersonStore>(store: &S, event: PersonEvent) -> Result<(), ApiError> {
  match event {
    PersonEvent::Added(added) => {
      store
        .add_person(Person { id: added.person_id, name: added.name })
        .await
        .map_err(store_failure)?;
    }
    PersonEvent::Renamed(renamed) => {
      store
        .rename_person(renamed.person_id, renamed.name)
        .await
        .map_err(store_failure)?
        .ok_or_else(ApiError::person_not_found)?;
    }
    PersonEvent::Removed(removed) => {
      let removed = store.remove_person(removed.person_id).await.map_err(store_failure)?;
      if !removed {
        return Err(ApiError::person_not_found());
      }
    }
  }
  Ok(())
}

fn store_failure(e: impl std::error::Error) -> ApiError {
  tracing::error!(error = %e, "webhook store operation failed");
  ApiError::server(e)
}
