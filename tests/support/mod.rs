//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use course_catalog::error::{AppError, Result};
use course_catalog::models::{
    CourseOutline, CourseRef, DepartmentRef, OutlineRes, SectionDetailRaw, SectionInfo,
    SectionInstructor, SectionRef, SectionSchedule, TermKey,
};
use course_catalog::services::{CatalogSource, HarvestLimits};

pub fn term(code: &str) -> TermKey {
    code.parse().unwrap()
}

/// Limits small enough for tests, generous enough not to fire by accident.
pub fn quick_limits() -> HarvestLimits {
    HarvestLimits {
        departments: 4,
        courses: 3,
        sections: 2,
        request: Duration::from_secs(5),
        course: Duration::from_secs(10),
        department: Duration::from_secs(20),
        term: Duration::from_secs(30),
    }
}

pub fn section_detail(dept: &str, number: &str, code: &str, instructor: &str) -> SectionDetailRaw {
    SectionDetailRaw {
        info: SectionInfo {
            dept: dept.to_string(),
            number: number.to_string(),
            section: code.to_string(),
            title: format!("{dept} {number} title"),
            units: "3".to_string(),
            term: "Spring 2025".to_string(),
            delivery_method: "In Person".to_string(),
            class_number: "1234".to_string(),
            outline_path: String::new(),
        },
        instructors: vec![SectionInstructor {
            name: instructor.to_string(),
            email: String::new(),
        }],
        schedules: vec![SectionSchedule {
            start_date: "Mon Jan 06 00:00:00 PST 2025".to_string(),
            end_date: "Fri Apr 04 00:00:00 PDT 2025".to_string(),
            campus: "Burnaby".to_string(),
            days: "Mo, We".to_string(),
            start_time: "10:30".to_string(),
            end_time: "11:20".to_string(),
            section_code: "LEC".to_string(),
        }],
    }
}

/// Current and peak number of calls in flight.
#[derive(Default)]
pub struct Gauge {
    now: AtomicUsize,
    peak: AtomicUsize,
}

impl Gauge {
    fn enter(&self) {
        let now = self.now.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.now.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// In-memory catalog with per-node failure and delay injection.
///
/// Nodes are addressed by their path below the term: `CMPT`,
/// `CMPT/225`, `CMPT/225/D100`. The empty path is the department listing.
#[derive(Default)]
pub struct FakeCatalog {
    departments: Vec<DepartmentRef>,
    courses: HashMap<String, Vec<CourseRef>>,
    sections: HashMap<String, Vec<SectionRef>>,
    details: HashMap<String, SectionDetailRaw>,
    outlines: HashMap<String, CourseOutline>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    course_listings: Gauge,
    section_listings: Gauge,
    details_in_flight: Gauge,
    outline_calls: AtomicUsize,
    completed: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn department(mut self, value: &str) -> Self {
        if !self.departments.iter().any(|d| d.value == value) {
            self.departments.push(DepartmentRef {
                text: value.to_string(),
                name: value.to_string(),
                value: value.to_string(),
            });
        }
        self
    }

    /// Add a course whose sections are `(code, instructor)` pairs.
    pub fn course(mut self, dept: &str, number: &str, sections: &[(&str, &str)]) -> Self {
        self = self.department(dept);
        self.courses
            .entry(dept.to_string())
            .or_default()
            .push(CourseRef {
                text: number.to_string(),
                title: format!("{dept} {number} title"),
                value: number.to_string(),
            });

        let course_path = format!("{dept}/{number}");
        let refs = self.sections.entry(course_path.clone()).or_default();
        for (code, instructor) in sections {
            refs.push(SectionRef {
                text: code.to_string(),
                title: format!("{dept} {number} title"),
                value: code.to_string(),
            });
            self.details.insert(
                format!("{course_path}/{code}"),
                section_detail(dept, number, code, instructor),
            );
            self.outlines.insert(
                format!("{course_path}/{code}"),
                CourseOutline {
                    dept: dept.to_string(),
                    number: number.to_string(),
                    title: format!("{dept} {number} title"),
                    description: format!("About {dept} {number}"),
                    ..Default::default()
                },
            );
        }
        self
    }

    /// A course listed without a title; it must never be visited.
    pub fn untitled_course(mut self, dept: &str, number: &str) -> Self {
        self = self.department(dept);
        self.courses
            .entry(dept.to_string())
            .or_default()
            .push(CourseRef {
                text: number.to_string(),
                title: String::new(),
                value: number.to_string(),
            });
        self
    }

    /// Make every outline of a course come back with an empty department.
    pub fn blank_outline(mut self, dept: &str, number: &str) -> Self {
        let prefix = format!("{dept}/{number}/");
        for (path, outline) in self.outlines.iter_mut() {
            if path.starts_with(&prefix) {
                outline.dept = String::new();
            }
        }
        self
    }

    /// A department listed with an empty value.
    pub fn blank_department(mut self) -> Self {
        self.departments.push(DepartmentRef {
            text: "Blank".to_string(),
            name: "Blank".to_string(),
            value: String::new(),
        });
        self
    }

    pub fn fail(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    pub fn delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    /// Most department course listings in flight at once.
    pub fn course_listing_peak(&self) -> usize {
        self.course_listings.peak()
    }

    /// Most course section listings in flight at once.
    pub fn section_listing_peak(&self) -> usize {
        self.section_listings.peak()
    }

    pub fn detail_peak(&self) -> usize {
        self.details_in_flight.peak()
    }

    pub fn outline_calls(&self) -> usize {
        self.outline_calls.load(Ordering::SeqCst)
    }

    /// Section detail paths in completion order.
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }

    async fn visit(&self, path: &str) -> Result<()> {
        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(path) {
            return Err(AppError::HttpStatus {
                url: format!("fake://{path}"),
                status: 500,
                body: "internal error".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogSource for FakeCatalog {
    async fn departments(&self, _term: &TermKey) -> Result<Vec<DepartmentRef>> {
        self.visit("").await?;
        Ok(self.departments.clone())
    }

    async fn courses(&self, _term: &TermKey, dept: &str) -> Result<Vec<CourseRef>> {
        self.course_listings.enter();
        let outcome = self.visit(dept).await;
        self.course_listings.exit();
        outcome?;
        Ok(self.courses.get(dept).cloned().unwrap_or_default())
    }

    async fn sections(&self, _term: &TermKey, dept: &str, number: &str) -> Result<Vec<SectionRef>> {
        let path = format!("{dept}/{number}");
        self.section_listings.enter();
        let outcome = self.visit(&path).await;
        self.section_listings.exit();
        outcome?;
        Ok(self.sections.get(&path).cloned().unwrap_or_default())
    }

    async fn section_detail(
        &self,
        _term: &TermKey,
        dept: &str,
        number: &str,
        section: &str,
    ) -> Result<SectionDetailRaw> {
        let path = format!("{dept}/{number}/{section}");
        self.details_in_flight.enter();
        let outcome = self.visit(&path).await;
        self.details_in_flight.exit();
        outcome?;

        self.completed.lock().unwrap().push(path.clone());
        self.details
            .get(&path)
            .cloned()
            .ok_or_else(|| AppError::not_found(path))
    }

    async fn outline(
        &self,
        _term: &TermKey,
        dept: &str,
        number: &str,
        section: &str,
    ) -> Result<OutlineRes> {
        let path = format!("{dept}/{number}/{section}");
        self.outline_calls.fetch_add(1, Ordering::SeqCst);
        self.visit(&path).await?;
        self.outlines
            .get(&path)
            .cloned()
            .map(|info| OutlineRes { info })
            .ok_or_else(|| AppError::not_found(path))
    }
}

/// Serve canned `(status, body)` responses keyed by the request's query
/// string (the catalog node path, e.g. `2025/spring/cmpt`). Unknown paths
/// get a 404. Returns the base URL to hand to the client.
pub async fn serve_catalog(routes: HashMap<String, (u16, String)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let routes = routes.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }

                let request = String::from_utf8_lossy(&buf);
                let target = request.split_whitespace().nth(1).unwrap_or("/");
                let node = target.split_once('?').map(|(_, q)| q).unwrap_or("");
                let (status, body) = routes
                    .get(node)
                    .cloned()
                    .unwrap_or((404, "\"not found\"".to_string()));

                let response = format!(
                    "HTTP/1.1 {status} Status\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{addr}/course-outlines")
}
