//! Offline integration tests running the batch against an in-memory portal
//! and record store, plus an ignored live test against the real portal.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Url;
use tokio::sync::watch;

use inpi_status_sync::config::Config;
use inpi_status_sync::error::{AppError, NavigationError, RecordStoreError, TransportError};
use inpi_status_sync::infrastructure::{Document, Portal};
use inpi_status_sync::models::{ClassificationResult, ProtectionNumber};
use inpi_status_sync::orchestrator::{run_batch, App};
use inpi_status_sync::services::RecordStore;

const BASE: &str = "http://portal.test";

fn doc(path: &str, html: &str) -> Document {
    Document::new(
        Url::parse(BASE).unwrap().join(path).unwrap(),
        html.to_string(),
    )
}

/// In-memory portal serving a canned copy of the INPI page sequence
struct FakePortal {
    /// Status codes shown on each patent's detail page
    codes_by_number: HashMap<String, Vec<&'static str>>,
    /// Protection numbers whose detail fetch answers HTTP 500
    fail: HashSet<String>,
    /// Whether the entry page carries the patent-services menu link
    menu_present: bool,
    /// Whether the menu page carries the search form
    form_present: bool,
    /// Whether the search response carries the visited result link
    results_present: bool,
}

impl FakePortal {
    fn new(codes_by_number: HashMap<String, Vec<&'static str>>, fail: &[&str]) -> Self {
        Self {
            codes_by_number,
            fail: fail.iter().map(|s| s.to_string()).collect(),
            menu_present: true,
            form_present: true,
            results_present: true,
        }
    }

    fn without_menu_link() -> Self {
        Self {
            menu_present: false,
            ..Self::new(HashMap::new(), &[])
        }
    }

    fn without_search_form() -> Self {
        Self {
            form_present: false,
            ..Self::new(HashMap::new(), &[])
        }
    }

    fn without_result_link() -> Self {
        Self {
            results_present: false,
            ..Self::new(HashMap::new(), &[])
        }
    }

    fn entry_page(&self) -> Document {
        let html = if self.menu_present {
            r#"<map><area data-mce-href="menu-servicos/patente" href="/menu"></map>"#
        } else {
            "<html><body>manutenção programada</body></html>"
        };
        doc("/login", html)
    }

    fn details_page(&self, number: &str) -> Document {
        let anchors: String = self
            .codes_by_number
            .get(number)
            .map(|codes| {
                codes
                    .iter()
                    .map(|c| {
                        format!(r#"<a class="normal" href="javascript:void(0)">{}</a>"#, c)
                    })
                    .collect()
            })
            .unwrap_or_default();
        doc(&format!("/details/{}", number), &anchors)
    }
}

#[async_trait]
impl Portal for FakePortal {
    async fn fetch(&self, _url: &str) -> Result<Document, AppError> {
        Ok(self.entry_page())
    }

    async fn follow(&self, _from: &Document, href: &str) -> Result<Document, AppError> {
        if href == "/menu" {
            let html = if self.form_present {
                r#"<form action="/search" method="post"><input type="hidden" name="Action" value="SearchBasico"><input type="text" name="NumPedido" value=""></form>"#
            } else {
                "<html><body>consulta indisponível</body></html>"
            };
            return Ok(doc("/menu", html));
        }
        if let Some(number) = href.strip_prefix("/details/") {
            if self.fail.contains(number) {
                return Err(TransportError::BadStatus {
                    url: format!("{}{}", BASE, href),
                    status: 500,
                }
                .into());
            }
            return Ok(self.details_page(number));
        }
        Err(TransportError::BadStatus {
            url: format!("{}{}", BASE, href),
            status: 404,
        }
        .into())
    }

    async fn submit_form(
        &self,
        from: &Document,
        field: &str,
        value: &str,
    ) -> Result<Document, AppError> {
        assert_eq!(field, "NumPedido");
        if from.search_form().is_none() {
            return Err(NavigationError::FormNotFound {
                url: from.url().to_string(),
            }
            .into());
        }
        if !self.results_present {
            return Ok(doc("/search", "<p>nenhum resultado encontrado</p>"));
        }
        Ok(doc(
            "/search",
            &format!(r#"<a class="visitado" href="/details/{}">resultado</a>"#, value),
        ))
    }
}

/// In-memory record store that remembers its writes
struct MemoryStore {
    numbers: Vec<ProtectionNumber>,
    writes: Arc<Mutex<Vec<(ProtectionNumber, ClassificationResult)>>>,
    flushed: Arc<AtomicBool>,
}

impl MemoryStore {
    fn new(numbers: &[&str]) -> Self {
        Self {
            numbers: numbers
                .iter()
                .filter_map(|n| ProtectionNumber::new(n))
                .collect(),
            writes: Arc::new(Mutex::new(Vec::new())),
            flushed: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl RecordStore for MemoryStore {
    fn read_all(&self) -> Result<Vec<ProtectionNumber>, RecordStoreError> {
        Ok(self.numbers.clone())
    }

    fn write(
        &mut self,
        number: &ProtectionNumber,
        result: &ClassificationResult,
    ) -> Result<(), RecordStoreError> {
        self.writes
            .lock()
            .unwrap()
            .push((number.clone(), result.clone()));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), RecordStoreError> {
        self.flushed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Test configuration: no politeness delays, temp report files
fn test_config(tag: &str) -> Config {
    let tmp = std::env::temp_dir();
    Config {
        entry_url: format!("{}/login", BASE),
        max_concurrent_tasks: 3,
        start_delay_ms: 0,
        min_delay_ms: 0,
        max_delay_ms: 10,
        output_log_file: tmp
            .join(format!("inpi_test_log_{}_{}.txt", std::process::id(), tag))
            .to_string_lossy()
            .into_owned(),
        failure_report_file: tmp
            .join(format!("inpi_test_fail_{}_{}.txt", std::process::id(), tag))
            .to_string_lossy()
            .into_owned(),
        ..Config::default()
    }
}

fn numbers(list: &[&str]) -> Vec<ProtectionNumber> {
    list.iter().filter_map(|n| ProtectionNumber::new(n)).collect()
}

#[tokio::test]
async fn batch_collects_every_input_even_when_one_fails() {
    let mut codes = HashMap::new();
    for n in ["BR001", "BR002", "BR004", "BR005"] {
        codes.insert(n.to_string(), vec!["9.1"]);
    }
    let portal = Arc::new(FakePortal::new(codes, &["BR003"]));
    let config = test_config("one_fails");
    let (_tx, rx) = watch::channel(false);

    let input = numbers(&["BR001", "BR002", "BR003", "BR004", "BR005"]);
    let outcomes = run_batch(portal, &config, input.clone(), rx).await.unwrap();

    assert_eq!(outcomes.len(), 5);
    for number in &input {
        let outcome = outcomes.get(number).expect("every input key is present");
        if number.as_str() == "BR003" {
            assert!(matches!(
                outcome,
                Err(AppError::Transport(TransportError::BadStatus { status: 500, .. }))
            ));
        } else {
            assert_eq!(outcome.as_ref().unwrap(), &vec!["9.1".to_string()]);
        }
    }
}

#[tokio::test]
async fn missing_menu_link_fails_each_task_without_aborting() {
    let portal = Arc::new(FakePortal::without_menu_link());
    let config = test_config("no_menu");
    let (_tx, rx) = watch::channel(false);

    let outcomes = run_batch(portal, &config, numbers(&["BR001", "BR002"]), rx)
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 2);
    for outcome in outcomes.values() {
        assert!(matches!(
            outcome,
            Err(AppError::Navigation(NavigationError::MissingMenuLink { .. }))
        ));
    }
}

#[tokio::test]
async fn missing_search_form_fails_with_form_not_found() {
    let portal = Arc::new(FakePortal::without_search_form());
    let config = test_config("no_form");
    let (_tx, rx) = watch::channel(false);

    let outcomes = run_batch(portal, &config, numbers(&["BR001"]), rx)
        .await
        .unwrap();

    assert!(matches!(
        outcomes.get(&ProtectionNumber::new("BR001").unwrap()),
        Some(Err(AppError::Navigation(NavigationError::FormNotFound { .. })))
    ));
}

#[tokio::test]
async fn missing_result_link_fails_with_missing_details_link() {
    let portal = Arc::new(FakePortal::without_result_link());
    let config = test_config("no_result");
    let (_tx, rx) = watch::channel(false);

    let outcomes = run_batch(portal, &config, numbers(&["BR001"]), rx)
        .await
        .unwrap();

    assert!(matches!(
        outcomes.get(&ProtectionNumber::new("BR001").unwrap()),
        Some(Err(AppError::Navigation(
            NavigationError::MissingDetailsLink { .. }
        )))
    ));
}

#[tokio::test]
async fn duplicate_numbers_share_one_outcome_entry() {
    let mut codes = HashMap::new();
    codes.insert("BR001".to_string(), vec!["16.1"]);
    let portal = Arc::new(FakePortal::new(codes, &[]));
    let config = test_config("dupes");
    let (_tx, rx) = watch::channel(false);

    let outcomes = run_batch(portal, &config, numbers(&["BR001", "BR001"]), rx)
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 1);
}

#[tokio::test]
async fn shutdown_marks_unstarted_tasks_cancelled() {
    let mut codes = HashMap::new();
    codes.insert("BR001".to_string(), vec!["9.1"]);
    let portal = Arc::new(FakePortal::new(codes, &[]));
    let config = test_config("shutdown");
    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();

    let outcomes = run_batch(portal, &config, numbers(&["BR001", "BR002"]), rx)
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 2);
    for outcome in outcomes.values() {
        assert!(matches!(outcome, Err(AppError::Cancelled)));
    }
}

#[tokio::test]
async fn end_to_end_classifies_and_persists_only_successes() {
    let mut codes = HashMap::new();
    codes.insert("BR001".to_string(), vec!["8.12", "9.1"]);
    let portal = Arc::new(FakePortal::new(codes, &["BR002"]));

    let store = MemoryStore::new(&["BR001", "BR002"]);
    let writes = Arc::clone(&store.writes);
    let flushed = Arc::clone(&store.flushed);

    let app = App::new(test_config("end_to_end"), portal, Box::new(store));
    app.run().await.unwrap();

    let writes = writes.lock().unwrap();
    assert_eq!(writes.len(), 1, "only BR001 is written back");
    let (number, result) = &writes[0];
    assert_eq!(number.as_str(), "BR001");
    assert_eq!(result.verdict.label(), "NÃO VIGENTE");
    assert_eq!(
        result.despacho_text(),
        "8.12 - ARQ DEFINITIVO - FALTA DE PGT; 9.1 - DEFERIMENTO"
    );
    assert!(flushed.load(Ordering::SeqCst), "store is flushed at the end");
}

#[tokio::test]
async fn empty_store_is_fatal() {
    let portal = Arc::new(FakePortal::new(HashMap::new(), &[]));
    let store = MemoryStore::new(&[]);
    let app = App::new(test_config("empty"), portal, Box::new(store));

    let err = app.run().await.unwrap_err();
    assert!(err.to_string().contains("no protection numbers"));
}

#[tokio::test]
#[ignore] // requires network access to the INPI portal: cargo test -- --ignored
async fn live_portal_navigation() {
    inpi_status_sync::utils::logging::init();

    let config = Config::from_env();
    let throttle = Arc::new(inpi_status_sync::infrastructure::AutoThrottle::new(&config));
    let portal: Arc<dyn Portal> = Arc::new(
        inpi_status_sync::infrastructure::HttpPortal::new(&config, throttle)
            .expect("HTTP client builds"),
    );
    let (_tx, rx) = watch::channel(false);

    let input = numbers(&["BR102013001234"]);
    let outcomes = run_batch(portal, &config, input, rx).await.unwrap();
    assert_eq!(outcomes.len(), 1);
}
