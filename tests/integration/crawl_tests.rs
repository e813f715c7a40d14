//! Integration tests for the crawler
//!
//! Graph-shaped tests run the engine against in-memory link and sitemap
//! sources. End-to-end tests use wiremock to serve robots.txt, pages and
//! sitemaps over HTTP.

use async_trait::async_trait;
use job_scout::crawler::{
    run_session, CrawlEngine, CrawlSession, DiscoveredPage, LinkDiscoveryError, LinkSource,
    SitemapSource,
};
use job_scout::robots::{RobotsFailurePolicy, RobotsPolicy};
use job_scout::{ResultSource, ScoutError, SessionState};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const START: &str = "https://example.test/";

/// Site graph keyed by normalized URL; records every fetch
#[derive(Default)]
struct SiteGraph {
    pages: HashMap<String, Vec<String>>,
    fetched: Mutex<Vec<String>>,
}

impl SiteGraph {
    /// Adds a page; relative links are resolved against its URL
    fn page(mut self, url: &str, links: &[&str]) -> Self {
        let base = Url::parse(url).unwrap();
        let links = links
            .iter()
            .map(|l| base.join(l).unwrap().to_string())
            .collect();
        self.pages.insert(url.to_string(), links);
        self
    }

    fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl LinkSource for SiteGraph {
    async fn fetch_for_links(
        &self,
        url: &Url,
        _timeout: Duration,
    ) -> Result<DiscoveredPage, LinkDiscoveryError> {
        self.fetched.lock().unwrap().push(url.to_string());
        self.pages
            .get(url.as_str())
            .map(|links| DiscoveredPage {
                html: Some(String::new()),
                links: links.clone(),
            })
            .ok_or_else(|| LinkDiscoveryError::Http {
                url: url.to_string(),
                status: 404,
            })
    }
}

struct StaticSitemap(Vec<String>);

#[async_trait]
impl SitemapSource for StaticSitemap {
    async fn enumerate(&self, _start_url: &Url) -> Vec<String> {
        self.0.clone()
    }
}

/// Homepage links to /about, /jobs/1 and /contact; /jobs/1 links to /jobs/2
fn careers_site() -> SiteGraph {
    SiteGraph::default()
        .page(
            START,
            &[
                "https://example.test/about",
                "https://example.test/jobs/1",
                "https://example.test/contact",
            ],
        )
        .page("https://example.test/about", &[])
        .page("https://example.test/jobs/1", &["/jobs/2", "https://example.test/jobs/2"])
        .page("https://example.test/jobs/2", &[])
        .page("https://example.test/contact", &[])
}

fn jobs_session() -> CrawlSession {
    CrawlSession::new("https://example.test")
        .unwrap()
        .with_keywords(vec![Regex::new("jobs").unwrap()])
        .with_max_visits(5)
        .with_delay(Duration::ZERO)
        .with_sitemap(false)
}

fn result_urls(engine: &CrawlEngine) -> HashSet<String> {
    engine.results().urls().map(str::to_string).collect()
}

fn urls(list: &[&str]) -> HashSet<String> {
    list.iter().map(|u| u.to_string()).collect()
}

#[tokio::test]
async fn test_targeted_crawl_keeps_only_vacancy_pages() {
    let site = Arc::new(careers_site());
    let mut engine = CrawlEngine::new(
        jobs_session().with_hesitancy(Some(0)),
        RobotsPolicy::allow_all(),
        site.clone(),
    );

    engine.crawl(true).await.unwrap();

    assert_eq!(
        result_urls(&engine),
        urls(&[
            START,
            "https://example.test/jobs/1",
            "https://example.test/jobs/2"
        ])
    );
    assert!(!site.fetched().contains(&"https://example.test/about".to_string()));
    assert!(!site.fetched().contains(&"https://example.test/contact".to_string()));
    assert_eq!(engine.state(), SessionState::Done);
}

#[tokio::test]
async fn test_untargeted_crawl_keeps_every_page() {
    let site = Arc::new(careers_site());
    let mut engine = CrawlEngine::new(
        jobs_session().with_hesitancy(Some(0)),
        RobotsPolicy::allow_all(),
        site,
    );

    engine.crawl(false).await.unwrap();

    assert_eq!(
        result_urls(&engine),
        urls(&[
            START,
            "https://example.test/about",
            "https://example.test/jobs/1",
            "https://example.test/contact",
            "https://example.test/jobs/2"
        ])
    );

    let about = engine.results().get("https://example.test/about").unwrap();
    assert!(!about.targeted);
    assert_eq!(about.estimated_depth, Some(0));
}

#[tokio::test]
async fn test_sitemap_bypasses_visit_budget() {
    let site = Arc::new(careers_site());
    let sitemap = Arc::new(StaticSitemap(vec![
        "https://example.test/jobs/99".to_string(),
    ]));
    let session = jobs_session().with_max_visits(1).with_sitemap(true);

    let mut engine = CrawlEngine::new(session, RobotsPolicy::allow_all(), site)
        .with_sitemap_source(sitemap);
    engine.crawl(true).await.unwrap();

    let record = engine.results().get("https://example.test/jobs/99").unwrap();
    assert_eq!(record.source, ResultSource::Sitemap);
    assert!(engine.visited_count() > 1);
}

#[tokio::test]
async fn test_robots_denied_pages_never_visited() {
    let robots = RobotsPolicy::from_content("User-agent: *\nDisallow: /private/");

    for targeted in [true, false] {
        let site = Arc::new(
            SiteGraph::default()
                .page(START, &["https://example.test/private/x", "/jobs"])
                .page("https://example.test/private/x", &[])
                .page("https://example.test/jobs", &[]),
        );
        let mut engine = CrawlEngine::new(jobs_session(), robots.clone(), site.clone());
        engine.crawl(targeted).await.unwrap();

        assert!(!site.fetched().contains(&"https://example.test/private/x".to_string()));
        assert!(!engine.results().contains("https://example.test/private/x"));
        assert!(engine.results().contains("https://example.test/jobs"));
    }
}

#[tokio::test]
async fn test_visit_bound_holds() {
    // An endless chain of pages
    let mut site = SiteGraph::default();
    let mut previous = START.to_string();
    for i in 0..50 {
        let next = format!("https://example.test/page/{}", i);
        site = site.page(&previous, &[next.as_str()]);
        previous = next;
    }
    let site = Arc::new(site);

    let session = jobs_session().with_keywords(Vec::new()).with_max_visits(3);
    let mut engine = CrawlEngine::new(session, RobotsPolicy::allow_all(), site.clone());
    engine.crawl(true).await.unwrap();

    assert!(engine.visited_count() <= 4);
    assert_eq!(site.fetched().len(), engine.visited_count());
}

#[tokio::test]
async fn test_each_page_visited_once_and_on_site() {
    let site = Arc::new(
        SiteGraph::default()
            .page(
                START,
                &[
                    "/a",
                    "/b",
                    "/a/",
                    "/a#team",
                    "https://other.test/jobs",
                    "https://jobs.example.test/",
                ],
            )
            .page("https://example.test/a", &["/", "/b", "/a"])
            .page("https://example.test/b", &["/a", "https://example.test/b?utm_source=x"]),
    );
    let session = jobs_session().with_keywords(Vec::new()).with_max_visits(100);
    let mut engine = CrawlEngine::new(session, RobotsPolicy::allow_all(), site.clone());
    engine.crawl(true).await.unwrap();

    let fetched = site.fetched();
    let unique: HashSet<&String> = fetched.iter().collect();
    assert_eq!(unique.len(), fetched.len());
    assert_eq!(fetched.len(), 3);

    for url in &fetched {
        let parsed = Url::parse(url).unwrap();
        assert_eq!(parsed.host_str(), Some("example.test"));
    }
}

#[tokio::test]
async fn test_higher_hesitancy_never_visits_less() {
    let graph = || {
        SiteGraph::default()
            .page(START, &["/about", "/team/a"])
            .page("https://example.test/about", &["/about/history"])
            .page("https://example.test/team/a", &["/team/a/jobs"])
            .page("https://example.test/about/history", &["/about/history/jobs"])
            .page("https://example.test/team/a/jobs", &[])
            .page("https://example.test/about/history/jobs", &[])
    };

    let mut previous: Option<HashSet<String>> = None;
    for hesitancy in 0..4 {
        let site = Arc::new(graph());
        let session = jobs_session()
            .with_max_visits(100)
            .with_hesitancy(Some(hesitancy));
        let mut engine = CrawlEngine::new(session, RobotsPolicy::allow_all(), site.clone());
        engine.crawl(true).await.unwrap();

        let visited: HashSet<String> = site.fetched().into_iter().collect();
        if let Some(previous) = &previous {
            assert!(
                previous.is_subset(&visited),
                "hesitancy {} visited {:?}, fewer than {:?}",
                hesitancy,
                visited,
                previous
            );
        }
        previous = Some(visited);
    }

    // Deep enough hesitancy reaches every vacancy page
    let all = previous.unwrap();
    assert!(all.contains("https://example.test/about/history/jobs"));
    assert!(all.contains("https://example.test/team/a/jobs"));
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body)
}

#[tokio::test]
async fn test_end_to_end_over_http() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "User-agent: *\nDisallow: /private/\nSitemap: {}/sitemap.xml\n",
            base
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/vacatures">Vacatures</a>
               <a href="/private/x">Intern</a>
               <a href="/over-ons">Over ons</a>
               <a href="https://elsewhere.test/vacatures">Partner</a>"#
                .to_string(),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/vacatures"))
        .respond_with(html(format!(
            r#"<a href="{}/vacatures/analist">Analist</a>"#,
            base
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/vacatures/analist"))
        .respond_with(html("<h1>Analist</h1>".to_string()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private/x"))
        .respond_with(html(String::new()))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/over-ons"))
        .respond_with(html(String::new()))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<urlset><url><loc>{base}/vacatures/ontwikkelaar</loc></url><url><loc>{base}/private/vacatures</loc></url></urlset>"#
        )))
        .mount(&server)
        .await;

    let session = CrawlSession::new(&format!("{}/", base))
        .unwrap()
        .with_keywords(vec![Regex::new("vacature(s)?").unwrap()])
        .with_delay(Duration::ZERO);

    let engine = run_session(session, true).await.unwrap();
    let results: Vec<&str> = engine.results().urls().collect();

    assert_eq!(
        results,
        vec![
            format!("{}/", base),
            format!("{}/vacatures", base),
            format!("{}/vacatures/analist", base),
            format!("{}/vacatures/ontwikkelaar", base),
        ]
    );
    assert_eq!(
        engine
            .results()
            .get(&format!("{}/vacatures/ontwikkelaar", base))
            .unwrap()
            .source,
        ResultSource::Sitemap
    );
}

#[tokio::test]
async fn test_robots_server_error_can_abort_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(String::new()))
        .expect(0)
        .mount(&server)
        .await;

    let session = CrawlSession::new(&server.uri())
        .unwrap()
        .with_delay(Duration::ZERO)
        .with_robots_failure(RobotsFailurePolicy::Abort);

    let result = run_session(session, true).await;
    assert!(matches!(result, Err(ScoutError::Robots { .. })));
}

#[tokio::test]
async fn test_robots_server_error_allows_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(String::new()))
        .expect(1)
        .mount(&server)
        .await;

    let session = CrawlSession::new(&server.uri())
        .unwrap()
        .with_delay(Duration::ZERO)
        .with_sitemap(false);

    let engine = run_session(session, true).await.unwrap();
    assert_eq!(engine.visited_count(), 1);
}
