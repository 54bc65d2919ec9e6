use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

pub fn append_lines<S: AsRef<str>>(path: &Path, lines: &[S]) {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .unwrap();
    for line in lines {
        writeln!(file, "{}", line.as_ref()).unwrap();
    }
    file.sync_data().unwrap();
}

/// A wire-format line on 2024-09-29.
pub fn access_line(customer: &str, hms: &str, status: u16, duration: f64) -> String {
    format!("2024-09-29 {hms} {customer} /api/v1/resource1 {status} {duration}")
}
