use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use tracing::{error, info};

use viewer_core_api::ViewerApi;
use viewer_rest_api::endpoints::{GET_DASHBOARD, GET_HEALTH};
use viewer_rest_api::path_queries::DashboardQuery;

pub async fn run(port: u16, viewer: impl ViewerApi) -> anyhow::Result<()> {
    let address = SocketAddr::new(IpAddr::from([0, 0, 0, 0]), port);
    info!("Dashboard listening on {address}");
    axum::Server::bind(&address)
        .serve(router(viewer).into_make_service())
        .await?;
    Ok(())
}

pub fn router(viewer: impl ViewerApi) -> Router {
    let viewer: Arc<dyn ViewerApi> = Arc::new(viewer);
    Router::new()
        .route(GET_DASHBOARD, get(get_dashboard))
        .route(GET_HEALTH, get(get_health))
        .with_state(viewer)
}

async fn get_dashboard(
    State(viewer): State<Arc<dyn ViewerApi>>,
    Query(query): Query<DashboardQuery>,
) -> Html<String> {
    let dashboard_html = viewer
        .get_dashboard_html(query.start, query.end)
        .await
        .map_err(|err| error!("Error during dashboard building: '{err}'"))
        .unwrap_or("<p>Error during dashboard building</p>".to_string());
    Html(dashboard_html)
}

async fn get_health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    struct EchoViewer;

    #[async_trait]
    impl ViewerApi for EchoViewer {
        async fn get_dashboard_html(
            &self,
            start_date: Option<String>,
            end_date: Option<String>,
        ) -> Result<String> {
            match (start_date, end_date) {
                (Some(start), Some(end)) if start == "fail" => bail!("cannot build {end}"),
                (start, end) => Ok(format!("{start:?}|{end:?}")),
            }
        }
    }

    async fn get(uri: &str) -> (StatusCode, String) {
        let response = router(EchoViewer)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_dashboard_forwards_dates() {
        let (status, body) = get("/?start=2022-02-15&end=2022-03-15").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"Some("2022-02-15")|Some("2022-03-15")"#);

        let (_, body) = get("/").await;
        assert_eq!(body, "None|None");
    }

    #[tokio::test]
    async fn test_dashboard_error_page() {
        let (status, body) = get("/?start=fail&end=2022-03-15").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<p>Error during dashboard building</p>");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }
}
