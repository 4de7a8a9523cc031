#![allow(dead_code)]

use axum::Router;
use axum::extract::ConnectInfo;
use axum_test::TestServer;
use short_link::prelude::*;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;
use tower::Layer;

pub const LINKS_CSV: &str = "\
key,target,active
docs,https://example.com/docs,true
/Blog/,https://example.com/blog,
retired,https://example.com/retired,false
go.example.com,https://example.com/go,1
www.example.com,go.example.com,
__root,https://example.com/home,
";

/// Test application backed by a CSV file in a temporary directory.
pub struct TestApp {
    pub dir: TempDir,
    pub source_path: PathBuf,
    pub state: AppState,
}

impl TestApp {
    pub fn fallback_path(&self) -> PathBuf {
        self.dir.path().join("data/fallback.json")
    }

    pub fn router(&self, options: RouteOptions) -> Router {
        app_router(self.state.clone(), options).layer(MockConnectInfoLayer)
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router(RouteOptions::default())).unwrap()
    }

    pub fn admin_server(&self) -> TestServer {
        let options = RouteOptions {
            admin_api_enabled: true,
            ..RouteOptions::default()
        };
        TestServer::new(self.router(options)).unwrap()
    }

    pub fn refresh_service(&self) -> &Arc<RefreshService> {
        &self.state.refresh_service
    }
}

pub fn write_csv(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap();
}

/// Moves the mtime forward so the source reports a change.
pub fn touch_future(path: &Path) {
    let file = std::fs::OpenOptions::new().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(60))
        .unwrap();
}

/// Builds the full state around a CSV source and runs the startup refresh.
pub async fn create_test_app(csv: &str) -> TestApp {
    create_test_app_with(csv, ResponseOptions::default(), false).await
}

pub async fn create_test_app_with(
    csv: &str,
    responses: ResponseOptions,
    with_fallback: bool,
) -> TestApp {
    let dir = TempDir::new().unwrap();
    let source_path = dir.path().join("links.csv");
    write_csv(&source_path, csv);

    let fallback = with_fallback.then(|| dir.path().join("data/fallback.json"));
    let state = build_state(&source_path, fallback, responses);

    state.refresh_service.refresh(true).await.unwrap();

    TestApp {
        dir,
        source_path,
        state,
    }
}

pub fn build_state(
    source_path: &Path,
    fallback: Option<PathBuf>,
    responses: ResponseOptions,
) -> AppState {
    let key_options = KeyOptions::default();
    let source: Arc<dyn DataSource> = Arc::new(
        short_link::infrastructure::source::CsvDataSource::new(source_path),
    );

    let store = Arc::new(MappingStore::new());
    let updates = UpdateSender::spawn(store.clone(), 4);
    let refresh_service = Arc::new(
        RefreshService::new(
            source,
            store.clone(),
            updates.clone(),
            HookChain::standard(&key_options),
        )
        .with_fallback_file(fallback)
        .with_fetch_timeout(Duration::from_secs(5)),
    );

    let resolver = RedirectResolver::new(store, ResolverOptions::default());
    AppState::new(refresh_service, resolver, updates, responses)
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
