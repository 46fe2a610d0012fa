//! M-Lab project identifiers and their BigQuery naming

use crate::error::{BqsanityError, Result};

/// An M-Lab project with data in BigQuery.
///
/// The numeric discriminants match the `project` column values used in the
/// per-month tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Project {
    Ndt = 0,
    Npad = 1,
    Sidestream = 2,
    ParisTraceroute = 3,
}

impl Project {
    pub const ALL: [Project; 4] = [
        Project::Ndt,
        Project::Npad,
        Project::Sidestream,
        Project::ParisTraceroute,
    ];

    /// Translate a numeric project ID into a `Project`.
    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            0 => Ok(Project::Ndt),
            1 => Ok(Project::Npad),
            2 => Ok(Project::Sidestream),
            3 => Ok(Project::ParisTraceroute),
            _ => Err(BqsanityError::invalid_project(id)),
        }
    }

    /// Numeric ID as it appears in the per-month tables' `project` column.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Canonical name used in per-project table names.
    pub fn name(self) -> &'static str {
        match self {
            Project::Ndt => "ndt",
            Project::Npad => "npad",
            Project::Sidestream => "sidestream",
            Project::ParisTraceroute => "paris_traceroute",
        }
    }

    /// Whether tests for this project record intermediate web100 snapshots.
    ///
    /// SideStream snapshots are incorrectly marked as intermediate upstream,
    /// so only NDT and NPAD filter on the last entry.
    pub fn has_intermediate_snapshots(self) -> bool {
        matches!(self, Project::Ndt | Project::Npad)
    }
}
