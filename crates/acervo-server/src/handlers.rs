//! Operation handlers.
//!
//! One handler per contract operation, dispatched by operation id. Handlers
//! are synchronous: every operation is an in-memory store or directory
//! lookup, so there is nothing to await below this layer.
//!
//! Response bodies mirror the wire format exactly:
//!
//! - create: 201 `{"message":"Item criado","item":{...}}`
//! - list: 200 `[...]`
//! - delete: 200 `{"message":"Item excluído com sucesso"}`
//! - theme: 200 `{"rm":...,"tema":...,"description":...,"fields":[...]}`

use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use serde_json::{json, Value};

use acervo_core::{
    ops, AcervoError, AcervoResult, CollectionStore, Fields, ThemeDirectory,
};

use crate::response::{json_response, HttpResponse};
use crate::router::RouteMatch;

/// Shared application state: the item store and the theme directory.
#[derive(Debug, Clone)]
pub struct AppState {
    store: CollectionStore,
    themes: Arc<ThemeDirectory>,
}

impl AppState {
    /// Creates application state from its parts.
    #[must_use]
    pub fn new(store: CollectionStore, themes: Arc<ThemeDirectory>) -> Self {
        Self { store, themes }
    }

    /// Returns the item store.
    #[must_use]
    pub fn store(&self) -> &CollectionStore {
        &self.store
    }

    /// Returns the theme directory.
    #[must_use]
    pub fn themes(&self) -> &ThemeDirectory {
        &self.themes
    }
}

impl Default for AppState {
    /// Empty store plus the built-in theme directory.
    fn default() -> Self {
        Self::new(
            CollectionStore::new(),
            Arc::new(ThemeDirectory::default()),
        )
    }
}

/// Dispatches a matched route to its handler.
///
/// Domain failures surface as `Err`; the server funnels them into the
/// error envelope with the matching status code.
pub(crate) fn dispatch(
    state: &AppState,
    route: &RouteMatch,
    body: &Bytes,
) -> AcervoResult<HttpResponse> {
    match route.operation_id() {
        ops::CREATE_ITEM => create_item(state, route, body),
        ops::LIST_COLLECTION => Ok(list_collection(state, route)),
        ops::LIST_BY_OWNER => Ok(list_by_owner(state, route)),
        ops::DELETE_ITEM => delete_item(state, route),
        ops::GET_THEME => get_theme(state, route),
        other => {
            // Contract and dispatch table are both code; disagreement is a bug.
            tracing::error!(operation_id = other, "No handler for routed operation");
            Ok(json_response(
                StatusCode::NOT_IMPLEMENTED,
                &json!({ "error": "Not Implemented", "operation": other }),
            ))
        }
    }
}

/// `POST /{collection}`
fn create_item(state: &AppState, route: &RouteMatch, body: &Bytes) -> AcervoResult<HttpResponse> {
    let collection = route.param("collection").unwrap_or_default();
    let fields = parse_body(body)?;

    let item = state.store().insert(collection, fields)?;
    tracing::debug!(collection, item_id = item.id(), "Item created");

    Ok(json_response(
        StatusCode::CREATED,
        &json!({ "message": "Item criado", "item": item }),
    ))
}

/// `GET /{collection}`
fn list_collection(state: &AppState, route: &RouteMatch) -> HttpResponse {
    let collection = route.param("collection").unwrap_or_default();
    let items = state.store().list_all(collection);

    json_response(StatusCode::OK, &items)
}

/// `GET /{collection}/{rm}`
fn list_by_owner(state: &AppState, route: &RouteMatch) -> HttpResponse {
    let collection = route.param("collection").unwrap_or_default();
    let rm = route.param("rm").unwrap_or_default();
    let items = state.store().list_by_owner(collection, rm);

    json_response(StatusCode::OK, &items)
}

/// `DELETE /{collection}/{rm}/{id}`
fn delete_item(state: &AppState, route: &RouteMatch) -> AcervoResult<HttpResponse> {
    let collection = route.param("collection").unwrap_or_default();
    let rm = route.param("rm").unwrap_or_default();
    let id = route.param("id").unwrap_or_default();

    state.store().delete_by_owner_and_id(collection, rm, id)?;
    tracing::debug!(collection, rm, id, "Item deleted");

    Ok(json_response(
        StatusCode::OK,
        &json!({ "message": "Item excluído com sucesso" }),
    ))
}

/// `GET /tema/{rm}`
fn get_theme(state: &AppState, route: &RouteMatch) -> AcervoResult<HttpResponse> {
    let rm = route.param("rm").unwrap_or_default();
    let theme = state.themes().resolve(rm)?;

    Ok(json_response(StatusCode::OK, &theme))
}

/// Parses a request body into item fields.
///
/// An empty body and valid non-object JSON both yield an empty field map,
/// leaving the mandatory-`rm` check to the store. Only malformed JSON is
/// rejected here.
fn parse_body(body: &Bytes) -> AcervoResult<Fields> {
    if body.is_empty() {
        return Ok(Fields::new());
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|_| AcervoError::validation("JSON inválido no corpo da requisição"))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Ok(Fields::new()),
    }
}
