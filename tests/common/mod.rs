use stabilizer_tableau_rust::prelude::*;

#[allow(dead_code)]
pub fn pauli(literal: &str) -> PauliOperator {
    literal.parse().unwrap()
}

#[allow(dead_code)]
pub fn paulis(literals: &[&str]) -> Vec<PauliOperator> {
    literals.iter().map(|literal| literal.parse().unwrap()).collect()
}

#[allow(dead_code)]
pub fn stabilizer(literal: &str) -> Stabilizer {
    literal.parse().unwrap()
}

#[allow(dead_code)]
/// Asserts that the tableau holds exactly the given rows, phases included.
pub fn assert_rows(tab: &Tableau, expected: &[&str]) {
    assert_eq!(
        tab.len(),
        expected.len(),
        "row count mismatch, tableau holds:\n{tab}"
    );
    for (i, literal) in expected.iter().enumerate() {
        let expected_row: PauliOperator = literal.parse().unwrap();
        assert_eq!(
            tab.row(i),
            expected_row,
            "row {i} mismatch (expected {literal}), tableau holds:\n{tab}"
        );
    }
}
