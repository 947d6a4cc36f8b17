#![allow(dead_code)]

use std::time::Duration;

use doclist::{Record, Timing};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Next control of a rendered listing page.
pub enum Next<'a> {
    Link(&'a str),
    Disabled,
    Dead,
}

/// Renders a listing page the way the downloads site lays it out.
pub fn listing_page(showing: Option<(usize, usize, usize)>, rows: &[Record], next: Next) -> String {
    let body: String = rows
        .iter()
        .map(|r| {
            format!(
                r#"<tr><th scope="row">{}</th><td>{}</td><td>{}</td>
                   <td><button class="downloadButton" data-link="{}">Download</button></td></tr>"#,
                r.name, r.download_type, r.upload_date, r.link
            )
        })
        .collect();

    let next = match next {
        Next::Link(href) => format!(r#"<li class="page-item"><a href="{href}">›</a></li>"#),
        Next::Disabled => r##"<li class="page-item disabled"><a href="#">›</a></li>"##.to_string(),
        Next::Dead => r##"<li class="page-item"><a aria-label="Next" href="#">›</a></li>"##.to_string(),
    };
    let showing = showing
        .map(|(s, e, t)| format!("<span>Showing {s} - {e} of {t}</span>"))
        .unwrap_or_default();

    format!(
        r#"<html><head><title>Downloads</title></head><body>
           <table><thead><tr><th>Name</th><th>Type</th><th>Date</th><th></th></tr></thead>
           <tbody>{body}</tbody></table>
           <div class="pagination-wrapper">{showing}
             <ul class="pagination"><li class="page-item"><a href="/list/1">‹</a></li>{next}</ul>
           </div></body></html>"#
    )
}

pub fn numbered(range: std::ops::RangeInclusive<usize>) -> Vec<Record> {
    range
        .map(|i| {
            Record::new(
                format!("Document {i:02}"),
                "STIG",
                format!("2023-01-{:02}", i % 28 + 1),
                format!("/d/{i}"),
            )
        })
        .collect()
}

pub async fn serve(server: &MockServer, at: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html; charset=utf-8"))
        .mount(server)
        .await;
}

/// Budgets small enough for a local server.
pub fn quick_timing() -> Timing {
    Timing {
        initial_rows: Duration::from_secs(2),
        indicator: Duration::from_secs(2),
        next_rows: Duration::from_secs(1),
        click: Duration::from_secs(2),
        poll_interval: Duration::from_millis(10),
        poll_attempts: 5,
    }
}
