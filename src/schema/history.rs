//! Per-generation records of the adaptive DE controller.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// What happened in one completed generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Generation number, starting at 1.
    pub generation: usize,
    /// Simulation time at which the generation completed.
    pub time: f64,
    /// Incumbent judged this generation.
    pub s0_index: usize,
    /// Challenger slot judged this generation.
    pub snew_index: usize,
    /// Incumbent profit rate.
    pub s0_pps: f64,
    /// Challenger profit rate.
    pub snew_pps: f64,
    /// Whether the challenger replaced the incumbent.
    pub replaced: bool,
    /// Weight that produced the judged challenger.
    pub f_used: f64,
    /// Weight drawn for the next challenger.
    pub f_next: f64,
    /// Incumbent chosen for the next generation.
    pub next_s0_index: usize,
    /// Value of the next challenger.
    pub challenger: f64,
    /// Whether the convergence guard injected a random value.
    pub reseeded: Option<usize>,
    /// Location of the weight distribution after adaptation.
    pub mu_f: f64,
    /// Archive size after pruning.
    pub archive_len: usize,
    /// Strategy values at the end of the generation.
    pub stratvals: Vec<f64>,
}

/// Trajectory of the controller across generations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeHistory {
    /// One report per completed generation.
    pub reports: Vec<GenerationReport>,
    /// `muF` after each generation.
    pub mu_f: Vec<f64>,
    /// Weight drawn at each generation.
    pub f: Vec<f64>,
    /// Population standard deviation after each generation.
    pub diversity: Vec<f64>,
}

impl DeHistory {
    /// Append a report and its derived series.
    pub fn push(&mut self, report: GenerationReport, diversity: f64) {
        self.mu_f.push(report.mu_f);
        self.f.push(report.f_next);
        self.diversity.push(diversity);
        self.reports.push(report);
    }

    /// Number of completed generations.
    pub fn generations(&self) -> usize {
        self.reports.len()
    }

    /// Fraction of generations in which the challenger won.
    pub fn success_rate(&self) -> f64 {
        if self.reports.is_empty() {
            return 0.0;
        }
        let wins = self.reports.iter().filter(|r| r.replaced).count();
        wins as f64 / self.reports.len() as f64
    }

    /// Write the history as pretty JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
    }

    /// Read a history written by [`DeHistory::save_json`].
    pub fn load_json<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(generation: usize, replaced: bool) -> GenerationReport {
        GenerationReport {
            generation,
            time: generation as f64 * 10.0,
            s0_index: 0,
            snew_index: 3,
            s0_pps: 0.1,
            snew_pps: if replaced { 0.2 } else { 0.0 },
            replaced,
            f_used: 0.5,
            f_next: 0.6,
            next_s0_index: 1,
            challenger: 0.25,
            reseeded: None,
            mu_f: 0.5,
            archive_len: generation,
            stratvals: vec![0.0, 0.1, 0.2, 0.25],
        }
    }

    #[test]
    fn test_success_rate() {
        let mut history = DeHistory::default();
        assert_eq!(history.success_rate(), 0.0);
        history.push(report(1, true), 0.1);
        history.push(report(2, false), 0.1);
        assert_eq!(history.generations(), 2);
        assert_eq!(history.success_rate(), 0.5);
        assert_eq!(history.f, vec![0.6, 0.6]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let mut history = DeHistory::default();
        history.push(report(1, true), 0.3);
        history.save_json(&path).unwrap();

        let loaded = DeHistory::load_json(&path).unwrap();
        assert_eq!(loaded.reports, history.reports);
        assert_eq!(loaded.diversity, vec![0.3]);
    }
}
