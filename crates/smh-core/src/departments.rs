//! Department codes offered as subjects, with their display labels.

/// `(code, label)` pairs in display order.
pub const DEPARTMENTS: &[(&str, &str)] = &[
    ("CSE-BC", "CSE (IoT, Cyber Security including Blockchain Technology)"),
    ("R&A", "Robotics and Automation"),
    ("AIML", "Artificial Intelligence & Machine Learning"),
    ("CIVIL", "Civil Engineering"),
    ("CSE", "Computer Science and Engineering"),
    ("CSD", "Computer Science and Design"),
    ("ECE", "Electronics and Communication Engineering"),
    ("EEE", "Electrical and Electronics Engineering"),
    ("ISE", "Information Science and Engineering"),
    ("MECH", "Mechanical Engineering"),
    ("MCA", "Master of Computer Applications"),
    ("MBA", "Master of Business Administration"),
    ("BCA", "Bachelor of Computer Applications (BCA)"),
    ("BBA", "Bachelor of Business Administration (BBA)"),
    ("BSH", "Basic Sciences and Humanities"),
    ("BSC", "B.Sc. Honors"),
];

pub fn department_label(code: &str) -> Option<&'static str> {
    DEPARTMENTS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, label)| *label)
}
