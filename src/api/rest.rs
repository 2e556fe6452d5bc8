use std::convert::Infallible;
use std::sync::Arc;

use log::{debug, error};
use serde::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};
use warp::Filter;

use crate::categorization::{categorize, ProviderCategory, ProviderProfile};
use crate::storage::BundleStore;
use crate::transform::HealthRecords;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: String,
    pub sub_category: Option<String>,
}

type Reply = WithStatus<Json>;

/// Read-only JSON views over the bundle held by a [`BundleStore`].
pub struct RestApi {
    store: Arc<BundleStore>,
}

impl RestApi {
    pub fn new(store: Arc<BundleStore>) -> Self {
        RestApi { store }
    }

    pub fn routes(&self) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        // Provider routes
        self.list_providers()
            .or(self.get_provider())
            .or(self.provider_diagnoses())
            .or(self.provider_progress_notes())
            .or(self.provider_appointments())
            .or(self.provider_category())
            // Record-wide views
            .or(self.departments())
            .or(self.reports())
            .or(self.summary())
            .or(self.patient())
            .or(self.medications())
            // Categorization
            .or(self.providers_by_category())
            .or(self.post_categorize())
            .with(warp::log("carelens::api"))
    }

    fn with_store(&self) -> impl Filter<Extract = (Arc<BundleStore>,), Error = Infallible> + Clone {
        let store = Arc::clone(&self.store);
        warp::any().map(move || Arc::clone(&store))
    }

    fn list_providers(&self) -> impl Filter<Extract = (Reply,), Error = warp::Rejection> + Clone {
        warp::path!("api" / "providers")
            .and(warp::get())
            .and(self.with_store())
            .and_then(|store: Arc<BundleStore>| async move {
                view(&store, "Providers found", |records| Some(records.list_practitioners())).await
            })
    }

    fn get_provider(&self) -> impl Filter<Extract = (Reply,), Error = warp::Rejection> + Clone {
        warp::path!("api" / "providers" / String)
            .and(warp::get())
            .and(self.with_store())
            .and_then(|id: String, store: Arc<BundleStore>| async move {
                view(&store, "Provider found", |records| records.get_practitioner_by_id(&id)).await
            })
    }

    fn provider_diagnoses(&self) -> impl Filter<Extract = (Reply,), Error = warp::Rejection> + Clone {
        warp::path!("api" / "providers" / String / "diagnoses")
            .and(warp::get())
            .and(self.with_store())
            .and_then(|id: String, store: Arc<BundleStore>| async move {
                view(&store, "Diagnoses and treatment plans found", |records| {
                    known_provider(records, &id)
                        .map(|_| records.get_provider_diagnoses_and_treatment_plans(&id))
                })
                .await
            })
    }

    fn provider_progress_notes(&self) -> impl Filter<Extract = (Reply,), Error = warp::Rejection> + Clone {
        warp::path!("api" / "providers" / String / "progress-notes")
            .and(warp::get())
            .and(self.with_store())
            .and_then(|id: String, store: Arc<BundleStore>| async move {
                view(&store, "Progress notes found", |records| {
                    known_provider(records, &id).map(|_| records.get_provider_progress_notes(&id))
                })
                .await
            })
    }

    fn provider_appointments(&self) -> impl Filter<Extract = (Reply,), Error = warp::Rejection> + Clone {
        warp::path!("api" / "providers" / String / "appointments")
            .and(warp::get())
            .and(self.with_store())
            .and_then(|id: String, store: Arc<BundleStore>| async move {
                view(&store, "Appointments found", |records| {
                    known_provider(records, &id).map(|_| records.get_provider_appointments(&id))
                })
                .await
            })
    }

    fn provider_category(&self) -> impl Filter<Extract = (Reply,), Error = warp::Rejection> + Clone {
        warp::path!("api" / "providers" / String / "category")
            .and(warp::get())
            .and(self.with_store())
            .and_then(|id: String, store: Arc<BundleStore>| async move {
                view(&store, "Provider categorized", |records| {
                    records
                        .get_practitioner_by_id(&id)
                        .map(|provider| categorize(&(&provider).into()))
                })
                .await
            })
    }

    fn departments(&self) -> impl Filter<Extract = (Reply,), Error = warp::Rejection> + Clone {
        warp::path!("api" / "departments")
            .and(warp::get())
            .and(self.with_store())
            .and_then(|store: Arc<BundleStore>| async move {
                view(&store, "Departments found", |records| {
                    Some(records.group_practitioners_by_department())
                })
                .await
            })
    }

    fn reports(&self) -> impl Filter<Extract = (Reply,), Error = warp::Rejection> + Clone {
        warp::path!("api" / "reports")
            .and(warp::get())
            .and(self.with_store())
            .and_then(|store: Arc<BundleStore>| async move {
                view(&store, "Reports found", |records| {
                    Some(records.list_diagnostic_reports_as_reports())
                })
                .await
            })
    }

    fn summary(&self) -> impl Filter<Extract = (Reply,), Error = warp::Rejection> + Clone {
        warp::path!("api" / "summary")
            .and(warp::get())
            .and(self.with_store())
            .and_then(|store: Arc<BundleStore>| async move {
                view(&store, "Health summary", |records| {
                    Some(records.transform_fasten_health_data())
                })
                .await
            })
    }

    fn patient(&self) -> impl Filter<Extract = (Reply,), Error = warp::Rejection> + Clone {
        warp::path!("api" / "patient")
            .and(warp::get())
            .and(self.with_store())
            .and_then(|store: Arc<BundleStore>| async move {
                view(&store, "Patient found", |records| records.get_fasten_patient()).await
            })
    }

    fn medications(&self) -> impl Filter<Extract = (Reply,), Error = warp::Rejection> + Clone {
        warp::path!("api" / "medications")
            .and(warp::get())
            .and(self.with_store())
            .and_then(|store: Arc<BundleStore>| async move {
                view(&store, "Medications found", |records| Some(records.get_fasten_medications())).await
            })
    }

    fn providers_by_category(&self) -> impl Filter<Extract = (Reply,), Error = warp::Rejection> + Clone {
        warp::path!("api" / "categories")
            .and(warp::get())
            .and(warp::query::<CategoryQuery>())
            .and(self.with_store())
            .and_then(|query: CategoryQuery, store: Arc<BundleStore>| async move {
                // Unknown category labels are a client error
                let category = match query.category.parse::<ProviderCategory>() {
                    Ok(category) => category,
                    Err(err) => {
                        return Ok::<Reply, Infallible>(respond(StatusCode::BAD_REQUEST, err.to_string(), None))
                    }
                };
                view(&store, "Providers found", |records| {
                    Some(records.providers_in_category(category, query.sub_category.as_deref()))
                })
                .await
            })
    }

    fn post_categorize(&self) -> impl Filter<Extract = (Reply,), Error = warp::Rejection> + Clone {
        warp::path!("api" / "categorize")
            .and(warp::post())
            .and(warp::body::json())
            .map(|profile: ProviderProfile| {
                debug!("Categorizing {:?}", profile);
                success("Provider categorized", &categorize(&profile))
            })
    }
}

/// Takes a snapshot from the store and renders one view of it.
/// `None` from the view means the addressed record does not exist.
async fn view<T, F>(store: &BundleStore, message: &str, render: F) -> Result<Reply, Infallible>
where
    T: Serialize,
    F: FnOnce(&HealthRecords) -> Option<T>,
{
    // Snapshot of the current bundle
    let records = match store.records().await {
        Ok(records) => records,
        Err(err) => {
            error!("Failed to load records: {}", err);
            return Ok(respond(StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None));
        }
    };

    // Render the view
    Ok(match render(&records) {
        Some(data) => success(message, &data),
        None => respond(StatusCode::NOT_FOUND, "Not found", None),
    })
}

fn known_provider(records: &HealthRecords, id: &str) -> Option<()> {
    records.index().practitioner(id).map(|_| ())
}

fn success<T: Serialize>(message: &str, data: &T) -> Reply {
    match serde_json::to_value(data) {
        Ok(value) => respond(StatusCode::OK, message, Some(value)),
        Err(err) => respond(StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None),
    }
}

fn respond(code: StatusCode, message: impl Into<String>, data: Option<serde_json::Value>) -> Reply {
    let response = ApiResponse {
        status: if code.is_success() { "success" } else { "error" }.to_string(),
        message: message.into(),
        data,
    };
    warp::reply::with_status(warp::reply::json(&response), code)
}
