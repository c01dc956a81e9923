//! Curated job board and skill matching.
//!
//! The board itself is a fixed inventory; what's computed is the match
//! score between a posting's required skills and the user's profile, as
//! a rounded percentage of required skills the profile covers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::scoring::round_half_up_percent;

/// Workplace arrangement of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Workplace {
    Remote,
    OnSite,
    Hybrid,
}

impl fmt::Display for Workplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Workplace::Remote => write!(f, "Remote"),
            Workplace::OnSite => write!(f, "On-site"),
            Workplace::Hybrid => write!(f, "Hybrid"),
        }
    }
}

impl FromStr for Workplace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "remote" => Ok(Workplace::Remote),
            "on-site" | "onsite" => Ok(Workplace::OnSite),
            "hybrid" => Ok(Workplace::Hybrid),
            other => Err(format!("unknown workplace type: {other}")),
        }
    }
}

/// One curated job posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub company: String,
    pub role: String,
    pub salary: String,
    pub location: String,
    pub workplace: Workplace,
    pub skills_required: Vec<String>,
}

/// The curated posting inventory.
pub fn curated_jobs() -> Vec<JobPosting> {
    vec![
        JobPosting {
            id: "j1".into(),
            company: "Lumina Tech".into(),
            role: "Frontend Engineer".into(),
            salary: "$120k - $150k".into(),
            location: "Remote".into(),
            workplace: Workplace::Remote,
            skills_required: vec!["React".into(), "TypeScript".into(), "Tailwind".into()],
        },
        JobPosting {
            id: "j2".into(),
            company: "Quantum Systems".into(),
            role: "Full Stack Architect".into(),
            salary: "$160k - $200k".into(),
            location: "San Francisco, CA".into(),
            workplace: Workplace::OnSite,
            skills_required: vec!["Node.js".into(), "PostgreSQL".into(), "Docker".into()],
        },
        JobPosting {
            id: "j3".into(),
            company: "Neon Media".into(),
            role: "UI Developer".into(),
            salary: "$90k - $110k".into(),
            location: "Remote".into(),
            workplace: Workplace::Remote,
            skills_required: vec!["React".into(), "Figma".into(), "CSS".into()],
        },
    ]
}

/// Percentage of required skills present in the profile,
/// case-insensitive, rounded half-up. A posting with no requirements
/// matches everyone.
pub fn match_score(profile_skills: &[String], required: &[String]) -> u8 {
    if required.is_empty() {
        return 100;
    }
    let have: Vec<String> = profile_skills.iter().map(|s| s.to_lowercase()).collect();
    let matched = required
        .iter()
        .filter(|r| have.contains(&r.to_lowercase()))
        .count();
    round_half_up_percent(matched, required.len())
}

/// Postings for a workplace filter; `None` keeps everything.
pub fn filter_by_workplace(jobs: Vec<JobPosting>, workplace: Option<Workplace>) -> Vec<JobPosting> {
    match workplace {
        None => jobs,
        Some(w) => jobs.into_iter().filter(|j| j.workplace == w).collect(),
    }
}
