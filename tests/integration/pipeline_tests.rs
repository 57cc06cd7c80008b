//! End-to-end pipeline tests against a mock catalog site

use salvage_ingest::config::{Config, CrawlerConfig, LexiconConfig, OutputConfig, UserAgentConfig};
use salvage_ingest::identity::vehicle_identifier;
use salvage_ingest::output::snapshot_path;
use salvage_ingest::pipeline::{run_pipeline, CategoryOutcome};
use salvage_ingest::storage::{BatchOutcome, RunStatus, SqliteStorage, Storage};
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling the given categories
fn create_test_config(categories: &[(&str, String)], workdir: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_concurrent_requests: 4,
            min_delay_ms: 5,
            random_delay_ms: 5,
            request_timeout_secs: 5,
            allowed_domains: vec![],
        },
        user_agent: UserAgentConfig {
            agent: "salvage-ingest-test/1.0".to_string(),
        },
        output: OutputConfig {
            database_path: workdir.join("catalog.db").display().to_string(),
            snapshot_dir: workdir.join("snapshots").display().to_string(),
            load_from_snapshot: false,
        },
        lexicon: LexiconConfig::default(),
        categories: categories
            .iter()
            .map(|(name, url)| (name.to_string(), url.clone()))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn open_storage(config: &Config) -> SqliteStorage {
    SqliteStorage::open(Path::new(&config.output.database_path)).expect("open database")
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn listing_page(entries: &[(&str, &str)]) -> String {
    let items: String = entries
        .iter()
        .map(|(name, href)| format!(r#"<font size="2"><a href="{}">{}</a></font><br>"#, href, name))
        .collect();
    format!(
        r#"<html><body><font size="3">Purkuautot</font>{}</body></html>"#,
        items
    )
}

fn part_table(name: &str, code: &str, price: &str) -> String {
    format!(
        r#"<table width="75%" border="1">
          <tr><td><a href="kuvat/{code}.jpg"><img src="kuvat/{code}_t.jpg"></a></td><td></td><td>{name}</td></tr>
          <tr><td>Koodi</td><td>{code}</td></tr>
          <tr><td>Kuvaus</td><td>Used part</td></tr>
          <tr><td>Hinta</td><td><font color="red"><b>{price}</b></font></td></tr>
        </table>"#,
        name = name,
        code = code,
        price = price
    )
}

fn detail_page(parts: &[(&str, &str, &str)]) -> String {
    let tables: String = parts
        .iter()
        .map(|(name, code, price)| part_table(name, code, price))
        .collect();
    format!("<html><body>{}</body></html>", tables)
}

/// Mounts a motorcycle listing with two vehicles and their detail pages
async fn mount_motorcycles(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/purkumotot.htm"))
        .respond_with(html(listing_page(&[
            ("Suzuki RX 2019", "suzukirx2019.htm"),
            ("Kawasaki   KX 250\n 2001", "kawasakikx.htm"),
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/suzukirx2019.htm"))
        .respond_with(html(detail_page(&[
            ("Front brake", "FB-001", "45,00 €"),
            ("Mirror", "MI-002", "12.50 €"),
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kawasakikx.htm"))
        .respond_with(html(detail_page(&[("Exhaust", "EX-003", "ask for price")])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_ingest_single_category() {
    let server = MockServer::start().await;
    mount_motorcycles(&server).await;

    let workdir = TempDir::new().unwrap();
    let listing = format!("{}/purkumotot.htm", server.uri());
    let config = create_test_config(&[("motorcycles", listing)], workdir.path());
    let mut storage = open_storage(&config);

    let report = run_pipeline(&config, &mut storage, "hash").await.unwrap();

    assert_eq!(report.categories.len(), 1);
    assert_eq!(
        report.categories[0].outcome,
        CategoryOutcome::Committed(BatchOutcome {
            vehicles_attempted: 2,
            parts_attempted: 3,
        })
    );
    assert_eq!(report.total_written(), 5);
    assert_eq!(storage.count_vehicles().unwrap(), 2);
    assert_eq!(storage.count_parts().unwrap(), 3);

    let suzuki_url = format!("{}/suzukirx2019.htm", server.uri());
    let suzuki = storage
        .get_vehicle(&vehicle_identifier(&suzuki_url, "Suzuki RX 2019"))
        .unwrap()
        .expect("Suzuki should be stored");
    assert_eq!(suzuki.brand, "Suzuki");
    assert_eq!(suzuki.model, "RX");
    assert_eq!(suzuki.year, 2019);
    assert_eq!(suzuki.category, "motorcycles");
    assert_eq!(suzuki.listing_url, suzuki_url);

    let brake = suzuki
        .parts
        .iter()
        .find(|p| p.name == "Front brake")
        .expect("Front brake should be stored");
    assert_eq!(brake.price, 45.0);
    assert_eq!(brake.image_url, format!("{}/kuvat/FB-001.jpg", server.uri()));
    assert_eq!(
        brake.thumbnail_url,
        format!("{}/kuvat/FB-001_t.jpg", server.uri())
    );

    let kawasaki_url = format!("{}/kawasakikx.htm", server.uri());
    let kawasaki = storage
        .get_vehicle(&vehicle_identifier(&kawasaki_url, "Kawasaki KX 250 2001"))
        .unwrap()
        .expect("Kawasaki should be stored");
    assert_eq!(kawasaki.model, "KX 250");
    assert_eq!(kawasaki.year, 2001);
    assert_eq!(kawasaki.parts[0].price, 0.0);

    assert_eq!(
        storage.models_for_brand("motorcycles", "Suzuki").unwrap(),
        vec!["RX"]
    );

    let snapshot = snapshot_path(Path::new(&config.output.snapshot_dir), "motorcycles");
    assert!(snapshot.exists(), "snapshot should be written");
}

#[tokio::test]
async fn test_detail_failure_drops_only_that_vehicle() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/autot.htm"))
        .respond_with(html(listing_page(&[
            ("Volvo 240 1988", "volvo240.htm"),
            ("Saab 900 1990", "saab900.htm"),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/volvo240.htm"))
        .respond_with(html(detail_page(&[("Headlight", "HL-1", "30 €")])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/saab900.htm"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let workdir = TempDir::new().unwrap();
    let listing = format!("{}/autot.htm", server.uri());
    let config = create_test_config(&[("cars", listing)], workdir.path());
    let mut storage = open_storage(&config);

    let report = run_pipeline(&config, &mut storage, "hash").await.unwrap();

    assert_eq!(
        report.categories[0].outcome,
        CategoryOutcome::Committed(BatchOutcome {
            vehicles_attempted: 1,
            parts_attempted: 1,
        })
    );
    assert_eq!(storage.count_vehicles().unwrap(), 1);
    assert_eq!(storage.brands_for_type("cars").unwrap(), vec!["Volvo"]);
}

#[tokio::test]
async fn test_detail_page_without_part_tables_keeps_vehicle() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/purkumotot.htm"))
        .respond_with(html(listing_page(&[("Honda CB 500 1998", "hondacb500.htm")])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/hondacb500.htm"))
        .respond_with(html(
            "<html><body><p>Ei osia tällä hetkellä</p><table width=\"100%\"><tr><td>x</td></tr></table></body></html>"
                .to_string(),
        ))
        .mount(&server)
        .await;

    let workdir = TempDir::new().unwrap();
    let listing = format!("{}/purkumotot.htm", server.uri());
    let config = create_test_config(&[("motorcycles", listing)], workdir.path());
    let mut storage = open_storage(&config);

    let report = run_pipeline(&config, &mut storage, "hash").await.unwrap();

    assert_eq!(
        report.categories[0].outcome,
        CategoryOutcome::Committed(BatchOutcome {
            vehicles_attempted: 1,
            parts_attempted: 0,
        })
    );
    assert_eq!(storage.count_vehicles().unwrap(), 1);
    assert_eq!(storage.count_parts().unwrap(), 0);

    let detail_url = format!("{}/hondacb500.htm", server.uri());
    let honda = storage
        .get_vehicle(&vehicle_identifier(&detail_url, "Honda CB 500 1998"))
        .unwrap()
        .expect("Honda should be stored without parts");
    assert_eq!(honda.brand, "Honda");
    assert_eq!(honda.model, "CB 500");
    assert_eq!(honda.year, 1998);
    assert!(honda.parts.is_empty());
}

#[tokio::test]
async fn test_listing_failure_fails_only_that_category() {
    let server = MockServer::start().await;
    mount_motorcycles(&server).await;

    Mock::given(method("GET"))
        .and(path("/autot.htm"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let workdir = TempDir::new().unwrap();
    let config = create_test_config(
        &[
            ("cars", format!("{}/autot.htm", server.uri())),
            ("motorcycles", format!("{}/purkumotot.htm", server.uri())),
        ],
        workdir.path(),
    );
    let mut storage = open_storage(&config);

    let report = run_pipeline(&config, &mut storage, "hash").await.unwrap();

    assert_eq!(report.categories.len(), 2);
    assert_eq!(report.categories[0].category, "cars");
    match &report.categories[0].outcome {
        CategoryOutcome::Failed(message) => assert!(message.contains("503")),
        other => panic!("cars should have failed, got {:?}", other),
    }
    assert!(matches!(
        report.categories[1].outcome,
        CategoryOutcome::Committed(_)
    ));
    assert_eq!(report.failed_count(), 1);

    assert_eq!(storage.vehicle_types().unwrap(), vec!["motorcycles"]);

    let runs = storage.recent_runs(10).unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].category, "motorcycles");
    assert_eq!(runs[0].status, RunStatus::Committed);
    assert_eq!(runs[1].category, "cars");
    assert_eq!(runs[1].status, RunStatus::Failed);
    assert!(runs[1].error_message.as_deref().unwrap_or("").contains("503"));
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let server = MockServer::start().await;
    mount_motorcycles(&server).await;

    let workdir = TempDir::new().unwrap();
    let listing = format!("{}/purkumotot.htm", server.uri());
    let config = create_test_config(&[("motorcycles", listing)], workdir.path());

    {
        let mut storage = open_storage(&config);
        run_pipeline(&config, &mut storage, "hash").await.unwrap();
    }

    // Reopen the database file as a separate run would
    let mut storage = open_storage(&config);
    let report = run_pipeline(&config, &mut storage, "hash").await.unwrap();

    assert!(matches!(
        report.categories[0].outcome,
        CategoryOutcome::Committed(_)
    ));
    assert_eq!(storage.count_vehicles().unwrap(), 2);
    assert_eq!(storage.count_parts().unwrap(), 3);
    assert_eq!(storage.recent_runs(10).unwrap().len(), 2);
}

#[tokio::test]
async fn test_snapshot_replay_without_site() {
    let workdir = TempDir::new().unwrap();

    let mut config = {
        let server = MockServer::start().await;
        mount_motorcycles(&server).await;

        let listing = format!("{}/purkumotot.htm", server.uri());
        let config = create_test_config(&[("motorcycles", listing)], workdir.path());
        let mut storage = open_storage(&config);
        run_pipeline(&config, &mut storage, "hash").await.unwrap();
        config
        // The mock server shuts down here
    };

    config.output.database_path = workdir.path().join("replay.db").display().to_string();
    config.output.load_from_snapshot = true;

    let mut storage = open_storage(&config);
    let report = run_pipeline(&config, &mut storage, "hash").await.unwrap();

    assert_eq!(
        report.categories[0].outcome,
        CategoryOutcome::Committed(BatchOutcome {
            vehicles_attempted: 2,
            parts_attempted: 3,
        })
    );
    assert_eq!(storage.count_vehicles().unwrap(), 2);
    assert_eq!(storage.count_parts().unwrap(), 3);
}

#[tokio::test]
async fn test_links_outside_allowed_domains_are_skipped() {
    let server = MockServer::start().await;
    mount_motorcycles(&server).await;

    let workdir = TempDir::new().unwrap();
    let listing = format!("{}/purkumotot.htm", server.uri());
    let mut config = create_test_config(&[("motorcycles", listing)], workdir.path());
    config.crawler.allowed_domains = vec!["*.purkuosat.net".to_string()];
    let mut storage = open_storage(&config);

    let report = run_pipeline(&config, &mut storage, "hash").await.unwrap();

    assert_eq!(
        report.categories[0].outcome,
        CategoryOutcome::Committed(BatchOutcome::default())
    );
    assert_eq!(storage.count_vehicles().unwrap(), 0);
}
