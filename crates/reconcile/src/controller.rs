//! CRUD state machine for managed resources and the endpoint query read.

use crate::state::{transition, IllegalTransition, LifecycleState, Operation};
use logflare_client::{ApiResponse, LogflareApi, TransportError};
use logflare_model::{
    changed_server_fields, decode_rows, sensitive_values, EndpointQueryRecord, QueryEnvelope,
    ResourceKind, ResourceModel,
};
use tracing::{debug, info, warn};
use value_core::{redact_text, Diagnostic, Diagnostics};

/// Result of one lifecycle operation.
///
/// When `diagnostics` holds an error, `record` and `state` are the inputs
/// returned unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<R> {
    pub record: R,
    pub state: LifecycleState,
    pub diagnostics: Diagnostics,
    /// Server-owned fields whose value changed during a read
    pub drift: Vec<&'static str>,
}

impl<R> Outcome<R> {
    fn new(record: R, state: LifecycleState) -> Self {
        Self {
            record,
            state,
            diagnostics: Diagnostics::new(),
            drift: Vec::new(),
        }
    }

    fn failed(record: R, state: LifecycleState, diagnostics: Diagnostics) -> Self {
        Self {
            record,
            state,
            diagnostics,
            drift: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        !self.diagnostics.has_error()
    }
}

/// Result of an endpoint query read.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub record: EndpointQueryRecord,
    pub diagnostics: Diagnostics,
}

impl QueryOutcome {
    pub fn is_success(&self) -> bool {
        !self.diagnostics.has_error()
    }
}

/// Drives resources through their lifecycle, one outbound call per
/// operation.
///
/// Nothing is retried. Remote text quoted in a diagnostic (response bodies,
/// transport errors) never contains the current value of a sensitive field;
/// the operation, kind and status code around it are left as written.
pub struct Reconciler<'a, A: ?Sized> {
    api: &'a A,
}

impl<'a, A: LogflareApi + ?Sized> Reconciler<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Validate that `desired` maps to a request body. No call is made.
    pub fn plan<R: ResourceModel>(&self, state: LifecycleState, desired: R) -> Outcome<R> {
        let result = check_transition::<R>(state, Operation::Plan)
            .map_err(Diagnostics::from)
            .and_then(|target| {
                request_body(Operation::Plan, &desired)?;
                Ok(Outcome::new(desired.clone(), target))
            });
        finish(state, desired, result)
    }

    pub async fn create<R: ResourceModel>(&self, state: LifecycleState, desired: R) -> Outcome<R> {
        let secrets = sensitive_values(&desired);
        let result = self.try_create(state, &desired, &secrets).await;
        finish(state, desired, result)
    }

    /// Refresh server-owned fields. A record with no identity token is left
    /// untouched with a single warning.
    pub async fn read<R: ResourceModel>(&self, state: LifecycleState, record: R) -> Outcome<R> {
        let secrets = sensitive_values(&record);
        let result = self.try_read(state, &record, &secrets).await;
        finish(state, record, result)
    }

    /// Replace the remote resource with `desired`, sent in full.
    pub async fn update<R: ResourceModel>(
        &self,
        state: LifecycleState,
        prior: R,
        desired: R,
    ) -> Outcome<R> {
        let mut secrets = sensitive_values(&prior);
        secrets.extend(sensitive_values(&desired));
        let result = self.try_update(state, &prior, &desired, &secrets).await;
        finish(state, prior, result)
    }

    /// Delete the remote resource. A record with no identity token has
    /// nothing to delete and succeeds without a call.
    pub async fn delete<R: ResourceModel>(&self, state: LifecycleState, record: R) -> Outcome<R> {
        let secrets = sensitive_values(&record);
        let result = self.try_delete(state, &record, &secrets).await;
        finish(state, record, result)
    }

    /// Run a saved endpoint and decode its rows.
    pub async fn query(&self, record: EndpointQueryRecord) -> QueryOutcome {
        let (record, diagnostics) = match self.try_query(&record).await {
            Ok(updated) => (updated, Diagnostics::new()),
            Err(diagnostics) => (record, diagnostics),
        };
        QueryOutcome {
            record,
            diagnostics,
        }
    }

    async fn try_create<R: ResourceModel>(
        &self,
        state: LifecycleState,
        desired: &R,
        secrets: &[String],
    ) -> Result<Outcome<R>, Diagnostics> {
        let op = Operation::Create;
        let target = check_transition::<R>(state, op)?;
        if desired.token().is_some() {
            // An identity token means the remote resource already exists
            return Err(Diagnostic::from(IllegalTransition {
                op,
                kind: R::KIND.name(),
                from: LifecycleState::Live,
            })
            .into());
        }

        let body = request_body(op, desired)?;
        let response = self
            .api
            .create(R::KIND, &body)
            .await
            .map_err(|e| transport_error(op, R::KIND, &e, secrets))?;
        log_response(op, R::KIND, &response);

        if response.status != 201 || !response.has_body() {
            return Err(status_error(op, R::KIND, &response, secrets).into());
        }

        let record = decode_response(op, &response, desired, secrets)?;
        info!(kind = %R::KIND, from = %state, to = %target, "Resource created");
        Ok(Outcome::new(record, target))
    }

    async fn try_read<R: ResourceModel>(
        &self,
        state: LifecycleState,
        record: &R,
        secrets: &[String],
    ) -> Result<Outcome<R>, Diagnostics> {
        let op = Operation::Read;
        let Some(token) = record.token() else {
            warn!(kind = %R::KIND, "Read ignored, no identity token");
            let mut outcome = Outcome::new(record.clone(), state);
            outcome.diagnostics.add_warning(
                "Resource Read Ignored",
                format!("{} token is null, cannot read.", R::KIND.title()),
            );
            return Ok(outcome);
        };
        let target = check_transition::<R>(state, op)?;

        let response = self
            .api
            .show(R::KIND, token)
            .await
            .map_err(|e| transport_error(op, R::KIND, &e, secrets))?;
        log_response(op, R::KIND, &response);

        if response.status != 200 || !response.has_body() {
            return Err(status_error(op, R::KIND, &response, secrets).into());
        }

        let fresh = decode_response(op, &response, record, secrets)?;
        let drift = changed_server_fields(record, &fresh);
        if !drift.is_empty() {
            let from = state.before_read(&drift);
            info!(kind = %R::KIND, fields = ?drift, %from, to = %target, "Drift detected");
        }

        Ok(Outcome {
            drift,
            ..Outcome::new(fresh, target)
        })
    }

    async fn try_update<R: ResourceModel>(
        &self,
        state: LifecycleState,
        prior: &R,
        desired: &R,
        secrets: &[String],
    ) -> Result<Outcome<R>, Diagnostics> {
        let op = Operation::Update;
        let target = check_transition::<R>(state, op)?;

        let desired = desired.clone().inherit_computed(prior);
        let Some(token) = desired.token() else {
            return Err(Diagnostic::error(
                "Missing Identity Token",
                format!("Unable to {op} {}, no identity token is known", R::KIND),
            )
            .into());
        };

        let body = request_body(op, &desired)?;
        let response = self
            .api
            .update(R::KIND, token, &body)
            .await
            .map_err(|e| transport_error(op, R::KIND, &e, secrets))?;
        log_response(op, R::KIND, &response);

        if !response.is_success() {
            return Err(status_error(op, R::KIND, &response, secrets).into());
        }

        let record = if response.has_body() {
            decode_response(op, &response, &desired, secrets)?.inherit_computed(&desired)
        } else {
            desired
        };
        info!(kind = %R::KIND, from = %state, to = %target, "Resource updated");
        Ok(Outcome::new(record, target))
    }

    async fn try_delete<R: ResourceModel>(
        &self,
        state: LifecycleState,
        record: &R,
        secrets: &[String],
    ) -> Result<Outcome<R>, Diagnostics> {
        let op = Operation::Delete;
        let Some(token) = record.token() else {
            debug!(kind = %R::KIND, "Nothing to delete, no identity token");
            return Ok(Outcome::new(record.clone(), LifecycleState::Destroyed));
        };
        let target = check_transition::<R>(state, op)?;

        let response = self
            .api
            .delete(R::KIND, token)
            .await
            .map_err(|e| transport_error(op, R::KIND, &e, secrets))?;
        log_response(op, R::KIND, &response);

        if response.status != 204 {
            return Err(status_error(op, R::KIND, &response, secrets).into());
        }

        info!(kind = %R::KIND, from = %state, to = %target, "Resource deleted");
        Ok(Outcome::new(record.clone(), target))
    }

    async fn try_query(
        &self,
        record: &EndpointQueryRecord,
    ) -> Result<EndpointQueryRecord, Diagnostics> {
        let secrets = [record.name_or_token.expose().clone()];
        let response = self
            .api
            .query(record.name_or_token.expose())
            .await
            .map_err(|e| {
                Diagnostic::error(
                    "Client Error",
                    format!(
                        "Unable to read endpoints, got error: {}",
                        redact_text(&e.to_string(), &secrets)
                    ),
                )
            })?;
        debug!(status = response.status, "Endpoint query response");

        if response.status != 200 || !response.has_body() {
            return Err(Diagnostic::error(
                "Client Error",
                format!(
                    "Unable to read endpoints, got status {}: {}",
                    response.status,
                    redact_text(&response.body, &secrets)
                ),
            )
            .into());
        }

        let envelope: QueryEnvelope = response.json().map_err(|e| {
            Diagnostic::error(
                "Client Error",
                format!(
                    "Unable to read endpoints, got error: {}",
                    redact_text(&e.to_string(), &secrets)
                ),
            )
        })?;
        if let Some(message) = envelope.error_message() {
            return Err(Diagnostic::error(
                "Response Error",
                format!(
                    "Endpoints API returned an error: {}",
                    redact_text(&message, &secrets)
                ),
            )
            .into());
        }

        let rows = envelope.result.unwrap_or_default();
        let result = decode_rows(&rows)?;
        Ok(EndpointQueryRecord {
            name_or_token: record.name_or_token.clone(),
            result: Some(result),
        })
    }
}

fn check_transition<R: ResourceModel>(
    from: LifecycleState,
    op: Operation,
) -> Result<LifecycleState, Diagnostic> {
    transition(from, op).ok_or_else(|| {
        IllegalTransition {
            op,
            kind: R::KIND.name(),
            from,
        }
        .into()
    })
}

fn request_body<R: ResourceModel>(op: Operation, record: &R) -> Result<serde_json::Value, Diagnostics> {
    let wire = record.to_wire()?;
    serde_json::to_value(&wire).map_err(|e| {
        Diagnostic::error(
            "Client Error",
            format!("Unable to {op} {}, request body could not be encoded: {e}", R::KIND),
        )
        .into()
    })
}

fn decode_response<R: ResourceModel>(
    op: Operation,
    response: &ApiResponse,
    base: &R,
    secrets: &[String],
) -> Result<R, Diagnostics> {
    let wire: R::Wire = response
        .json()
        .map_err(|e| transport_error(op, R::KIND, &e, secrets))?;
    R::from_wire(wire, base)
}

// Only the quoted remote text is redacted.
fn transport_error(
    op: Operation,
    kind: ResourceKind,
    err: &TransportError,
    secrets: &[String],
) -> Diagnostic {
    Diagnostic::error(
        "Client Error",
        format!(
            "Unable to {op} {kind}, got error: {}",
            redact_text(&err.to_string(), secrets)
        ),
    )
}

fn status_error(
    op: Operation,
    kind: ResourceKind,
    response: &ApiResponse,
    secrets: &[String],
) -> Diagnostic {
    Diagnostic::error(
        "Client Error",
        format!(
            "Unable to {op} {kind}, got status {}: {}",
            response.status,
            redact_text(&response.body, secrets)
        ),
    )
}

fn log_response(op: Operation, kind: ResourceKind, response: &ApiResponse) {
    debug!(%op, %kind, status = response.status, "Logflare API responded");
}

fn finish<R: ResourceModel>(
    state: LifecycleState,
    input: R,
    result: Result<Outcome<R>, Diagnostics>,
) -> Outcome<R> {
    match result {
        Ok(outcome) => outcome,
        Err(diagnostics) => Outcome::failed(input, state, diagnostics),
    }
}
