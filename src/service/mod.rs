//! Request handling for the `/calculate` and `/validate` endpoints.
//!
//! The handlers here are transport-agnostic: they take a request body and return a
//! status code plus a serializable envelope. Every error is converted into the
//! uniform `{ "success": false, "message": ... }` shape; nothing escapes as a fault.
//!
//! ```ignore
//! use pharmsim::service::Service;
//!
//! let service = Service::default();
//! let response = service.calculate_json(r#"{
//!     "compound": { "half_life": 6, "volume_of_distribution": 50 },
//!     "dosingInfo": { "dose": 500, "dosingSchedule": "Once a day", "route": "oral" }
//! }"#);
//! assert_eq!(response.status, 200);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PharmsimError;
use crate::resolver::{Resolver, ResolverDefaults};
use crate::simulator::{simulate_with, ConcentrationTrace, SimulationSettings};

/// Body of a `/calculate` request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalculateRequest {
    #[serde(default)]
    pub compound: Option<Map<String, Value>>,
    #[serde(default, rename = "dosingInfo")]
    pub dosing_info: Option<Map<String, Value>>,
}

/// Envelope returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Trace {
        success: bool,
        data: ConcentrationTrace,
    },
    Failure {
        success: bool,
        message: String,
    },
    Validation {
        success: bool,
        errors: Option<Vec<String>>,
    },
}

/// Status code and body of a handled request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub status: u16,
    pub body: ResponseBody,
}

impl Response {
    fn trace(data: ConcentrationTrace) -> Self {
        Self {
            status: 200,
            body: ResponseBody::Trace {
                success: true,
                data,
            },
        }
    }

    fn failure(error: &PharmsimError) -> Self {
        if error.is_user_error() {
            tracing::warn!(%error, "rejected calculation request");
        } else {
            tracing::error!(%error, "calculation failed");
        }
        Self {
            status: error.status_code(),
            body: ResponseBody::Failure {
                success: false,
                message: error.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        match &self.body {
            ResponseBody::Trace { success, .. }
            | ResponseBody::Validation { success, .. }
            | ResponseBody::Failure { success, .. } => *success,
        }
    }

    /// Serialize the body to JSON text.
    pub fn to_json(&self) -> Result<String, PharmsimError> {
        Ok(serde_json::to_string(&self.body)?)
    }
}

/// Stateless request handler. Safe to share between threads.
#[derive(Debug, Clone, Default)]
pub struct Service {
    resolver: Resolver,
    settings: SimulationSettings,
}

impl Service {
    pub fn new(defaults: ResolverDefaults, settings: SimulationSettings) -> Self {
        Self {
            resolver: Resolver::new(defaults),
            settings,
        }
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Resolve and simulate, returning the trace or the first error.
    pub fn try_calculate(
        &self,
        request: &CalculateRequest,
    ) -> Result<ConcentrationTrace, PharmsimError> {
        let empty = Map::new();
        let compound = request.compound.as_ref().unwrap_or(&empty);
        let dosing = request.dosing_info.as_ref().unwrap_or(&empty);
        let params = self.resolver.resolve_json(compound, dosing)?;
        simulate_with(&params, &self.settings)
    }

    /// Handle a parsed `/calculate` request.
    pub fn calculate(&self, request: &CalculateRequest) -> Response {
        match self.try_calculate(request) {
            Ok(trace) => Response::trace(trace),
            Err(error) => Response::failure(&error),
        }
    }

    /// Handle a raw `/calculate` request body.
    pub fn calculate_json(&self, body: &str) -> Response {
        match serde_json::from_str::<CalculateRequest>(body) {
            Ok(request) => self.calculate(&request),
            Err(error) => Response::failure(&PharmsimError::from(error)),
        }
    }

    /// Handle a `/validate` request. Validation beyond what `/calculate` performs is
    /// not implemented; the endpoint always reports success.
    pub fn validate(&self, _body: &str) -> Response {
        Response {
            status: 200,
            body: ResponseBody::Validation {
                success: true,
                errors: None,
            },
        }
    }
}
