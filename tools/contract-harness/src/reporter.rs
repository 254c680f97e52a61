//! Test result reporter — formats PASS/FAIL output and prints a summary.

use crate::{fixture::Fixture, runner::RunResult};

pub struct Reporter {
    passed: usize,
    /// `service/id` of every failed fixture, in run order.
    failed: Vec<String>,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter {
    pub fn new() -> Self {
        Self {
            passed: 0,
            failed: Vec::new(),
        }
    }

    pub fn record(&mut self, fixture: &Fixture, result: RunResult) {
        let millis = result.duration.as_millis();
        if result.passed() {
            self.passed += 1;
            println!(
                "PASS  [{}/{}] {} ({millis}ms)",
                fixture.service, fixture.id, fixture.description
            );
        } else {
            self.failed
                .push(format!("{}/{}", fixture.service, fixture.id));
            println!(
                "FAIL  [{}/{}] {} ({millis}ms)",
                fixture.service, fixture.id, fixture.description
            );
            if let Some(err) = &result.error {
                println!("        error: {err}");
            } else if let Some(actual) = result.actual_status {
                if actual != result.expected_status {
                    println!(
                        "        {} {} → expected {}, got {}",
                        fixture.request.method,
                        fixture.request.path,
                        result.expected_status,
                        actual
                    );
                }
                for mismatch in &result.header_mismatches {
                    println!("        header: {mismatch}");
                }
                if let Some(mismatch) = &result.body_mismatch {
                    println!("        {mismatch}");
                }
            }
        }
    }

    pub fn print_summary(&self) {
        println!();
        println!("────────────────────────────────────────────────────");
        println!(
            "Results: {} passed, {} failed",
            self.passed,
            self.failed.len()
        );
        for id in &self.failed {
            println!("  FAIL {id}");
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }
}
