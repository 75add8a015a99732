// Listing screens, each declared once and consumed by the generic controller.

use super::query::{FilterSpec, ListScreen};

pub const ALL: &str = "all";

pub static JOBS: ListScreen = ListScreen {
    name: "jobs",
    path: "/jobs",
    api_path: "/jobs",
    page_size: 10,
    filters: &[
        FilterSpec::new("status", "status", ALL),
        FilterSpec::new("category", "category", ALL),
        FilterSpec::new("verification", "verified", ALL),
    ],
};

pub static APPLICANTS: ListScreen = ListScreen {
    name: "applicants",
    path: "/applicants",
    api_path: "/applicants",
    page_size: 10,
    filters: &[
        FilterSpec::new("status", "status", ALL),
        FilterSpec::new("jobId", "job", ALL),
    ],
};

pub static TEAM_POSTED_JOBS: ListScreen = ListScreen {
    name: "team-jobs",
    path: "/team/:id/jobs",
    api_path: "/team/:id/jobs",
    page_size: 10,
    filters: &[FilterSpec::new("status", "status", ALL)],
};

pub static IMPORTS: ListScreen = ListScreen {
    name: "imports",
    path: "/imports",
    api_path: "/imports",
    page_size: 20,
    filters: &[
        FilterSpec::new("status", "status", ALL),
        FilterSpec::new("type", "type", ALL),
    ],
};
