//! End-to-end import: csv file on disk to normalized numbers.

use pretty_assertions::assert_eq;
use std::io::Write;
use wolfies_whatsapp::phone::{detect_and_normalize, DetectionRule};
use wolfies_whatsapp::sheet::read_table;

fn csv(lines: &[&str]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

#[test]
fn test_keyword_column_is_normalized() {
    let file = csv(&[
        "Name,Mobile No,City",
        "Ali,0300-1234567,Lahore",
        "Sara,00923211234567,Karachi",
        "Omar,923451234567,Multan",
        "Hina,3331234567,Quetta",
        "Zain,+923001112222,Islamabad",
        "Bad,12345,Nowhere",
    ]);

    let table = read_table(file.path()).unwrap();
    let detection = detect_and_normalize(&table).unwrap();

    assert_eq!(detection.column.name, "Mobile No");
    assert_eq!(detection.column.rule, DetectionRule::Keyword { keyword: "mobile" });
    let numbers: Vec<&str> = detection.accepted.iter().map(|n| n.as_str()).collect();
    assert_eq!(
        numbers,
        vec![
            "+923001234567",
            "+923211234567",
            "+923451234567",
            "+923331234567",
            "+923001112222",
        ]
    );
    assert_eq!(detection.rejected_count, 1);
    assert_eq!(detection.rejected[0].row, 6);
    assert_eq!(detection.total_rows(), table.row_count());
}

#[test]
fn test_unlabelled_numbers_found_by_content() {
    let file = csv(&["Name,Col B", "Ali,(0300) 1234567", "Sara,03211234567"]);

    let table = read_table(file.path()).unwrap();
    let detection = detect_and_normalize(&table).unwrap();

    assert_eq!(detection.column.index, 1);
    assert_eq!(detection.column.rule, DetectionRule::ContentSniff);
    // parentheses survive cleaning, so only the second row is valid
    assert_eq!(detection.accepted.len(), 1);
    assert_eq!(detection.total_rows(), 2);
}
