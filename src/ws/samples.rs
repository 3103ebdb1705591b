// Starter programs for freshly created rooms, keyed by runner language id.

pub const PYTHON: u32 = 71;
pub const JAVASCRIPT: u32 = 63;
pub const CPP: u32 = 54;
pub const JAVA: u32 = 62;

/// Sample program for a language id, `None` for languages without one.
pub fn sample_for(language_id: u32) -> Option<&'static str> {
    match language_id {
        PYTHON => Some(
            "# Sample Python program\ndef greet(name):\n    return f\"Hello, {name}!\"\n\nprint(greet(\"World\"))",
        ),
        JAVASCRIPT => Some(
            "// Sample JavaScript\nfunction greet(name) {\n  return \"Hello, \" + name;\n}\nconsole.log(greet(\"World\"));",
        ),
        CPP => Some(
            "// Sample C++\n#include <iostream>\nusing namespace std;\n\nint main() {\n    cout << \"Hello, World!\" << endl;\n    return 0;\n}",
        ),
        JAVA => Some(
            "// Sample Java\npublic class Main {\n    public static void main(String[] args) {\n        System.out.println(\"Hello, World!\");\n    }\n}",
        ),
        _ => None,
    }
}

/// Initial buffer for a new room. Falls back to the default language, then to an empty buffer.
pub fn initial_code(requested: Option<u32>, default_language_id: u32) -> String {
    requested
        .and_then(sample_for)
        .or_else(|| sample_for(default_language_id))
        .unwrap_or_default()
        .to_string()
}
