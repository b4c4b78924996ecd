//! End-to-end integration tests
//!
//! These tests validate the complete ledger pipeline using predefined CSV
//! test fixtures. Each test:
//! 1. Reads input.csv from a fixture directory
//! 2. Processes all ledger entries through the engine
//! 3. Generates the report CSV
//! 4. Compares actual output with expected.csv
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - Happy path scenarios
//! - Secondary-effect flows (investment funding, party settlement, fund reserve)
//! - The dashboard summary report
//! - Permissive skipped-secondary behavior
//! - Error conditions (unknown extra accounts, malformed rows)

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use rust_ledger_engine::cli::ReportKind;
    use rust_ledger_engine::pipeline::process_ledger;
    use std::fs;
    use std::path::Path;

    const OWNER: &str = "local";

    /// Run a test fixture by processing input.csv and comparing with expected.csv
    ///
    /// # Arguments
    ///
    /// * `fixture_name` - Name of the fixture directory (e.g., "happy_path")
    /// * `report` - Report kind the fixture's expected.csv was written for
    /// * `seed_defaults` - Whether the fixture assumes the seeded account set
    ///
    /// # Panics
    ///
    /// Panics if the fixture files cannot be read or the output does not
    /// match the expected CSV.
    fn run_test_fixture(fixture_name: &str, report: ReportKind, seed_defaults: bool) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.csv", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);

        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );
        assert!(
            Path::new(&expected_path).exists(),
            "Expected file not found: {}",
            expected_path
        );

        let mut output = Vec::new();
        process_ledger(
            Path::new(&input_path),
            &mut output,
            report,
            seed_defaults,
            OWNER,
        )
        .unwrap_or_else(|e| panic!("Failed to process ledger: {}", e));

        let actual_output = String::from_utf8(output).expect("Output was not UTF-8");
        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {}\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, actual_output, expected_output
        );
    }

    /// End-to-end test for all fixtures
    #[rstest]
    #[case("happy_path", ReportKind::Accounts, false)]
    #[case("investment_funding", ReportKind::Accounts, true)]
    #[case("party_settlement", ReportKind::Accounts, true)]
    #[case("fund_reserve", ReportKind::Accounts, true)]
    #[case("summary_dashboard", ReportKind::Summary, false)]
    #[case("skipped_secondary", ReportKind::Accounts, false)]
    #[case("unknown_extra", ReportKind::Accounts, false)]
    #[case("malformed_data", ReportKind::Accounts, false)]
    fn test_fixtures(
        #[case] fixture: &str,
        #[case] report: ReportKind,
        #[case] seed_defaults: bool,
    ) {
        run_test_fixture(fixture, report, seed_defaults);
    }
}
