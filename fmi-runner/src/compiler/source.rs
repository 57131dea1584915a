//! Just enough Modelica lexing to tell whether a source file declares a class.

use std::path::{Path, PathBuf};

use crate::error::CompilationError;

/// Keywords that introduce a class definition.
const CLASS_KEYWORDS: &[&str] = &[
    "model",
    "block",
    "class",
    "package",
    "record",
    "connector",
    "type",
    "function",
];

/// A Modelica source file read into memory.
#[derive(Debug)]
pub struct ModelicaSource {
    path: PathBuf,
    text: String,
}

impl ModelicaSource {
    pub fn read(path: &Path) -> Result<Self, CompilationError> {
        if !path.is_file() {
            return Err(CompilationError::SourceNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            text,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of all classes declared anywhere in the file, in order of appearance.
    pub fn declared_classes(&self) -> Vec<&str> {
        let code = strip_comments_and_strings(&self.text);
        let tokens = tokenize(&code);
        tokens
            .windows(2)
            .filter(|pair| CLASS_KEYWORDS.contains(&pair[0]) && is_identifier(pair[1]))
            .map(|pair| &self.text[span_of(&code, pair[1])])
            .collect()
    }

    /// Check that `model_name` is a valid class path whose last component is declared here.
    pub fn ensure_declares(&self, model_name: &str) -> Result<(), CompilationError> {
        validate_model_name(model_name)?;
        let short_name = model_name.rsplit('.').next().unwrap_or(model_name);
        if self.declared_classes().contains(&short_name) {
            Ok(())
        } else {
            Err(CompilationError::ModelNotFound {
                model: model_name.to_owned(),
                path: self.path.clone(),
            })
        }
    }
}

/// A model name is a dot-separated path of identifiers, e.g. `Modelica.Blocks.Examples.PID_Controller`.
pub fn validate_model_name(model_name: &str) -> Result<(), CompilationError> {
    if model_name.split('.').all(is_identifier) {
        Ok(())
    } else {
        Err(CompilationError::InvalidModelName(model_name.to_owned()))
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Replace comments and string literals with spaces, keeping byte offsets intact.
fn strip_comments_and_strings(text: &str) -> String {
    enum Mode {
        Code,
        LineComment,
        BlockComment,
        Str,
    }

    let mut out = String::with_capacity(text.len());
    let mut mode = Mode::Code;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match mode {
            Mode::Code => match (c, chars.peek().copied()) {
                ('/', Some('/')) => {
                    mode = Mode::LineComment;
                    out.push(' ');
                }
                ('/', Some('*')) => {
                    chars.next();
                    mode = Mode::BlockComment;
                    out.push_str("  ");
                }
                ('"', _) => {
                    mode = Mode::Str;
                    out.push(' ');
                }
                _ => out.push(c),
            },
            Mode::LineComment => {
                if c == '\n' {
                    mode = Mode::Code;
                    out.push('\n');
                } else {
                    blank(&mut out, c);
                }
            }
            Mode::BlockComment => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    mode = Mode::Code;
                    out.push_str("  ");
                } else {
                    blank(&mut out, c);
                }
            }
            Mode::Str => match c {
                '\\' => {
                    blank(&mut out, c);
                    if let Some(escaped) = chars.next() {
                        blank(&mut out, escaped);
                    }
                }
                '"' => {
                    mode = Mode::Code;
                    out.push(' ');
                }
                _ => blank(&mut out, c),
            },
        }
    }

    out
}

/// Push as many spaces as `c` has bytes, keeping newlines.
fn blank(out: &mut String, c: char) {
    if c == '\n' {
        out.push('\n');
    } else {
        out.extend(std::iter::repeat_n(' ', c.len_utf8()));
    }
}

fn tokenize(code: &str) -> Vec<&str> {
    code.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
        .collect()
}

/// Byte range of `token` inside `code`. `token` must be a subslice of `code`.
fn span_of(code: &str, token: &str) -> std::ops::Range<usize> {
    let start = token.as_ptr() as usize - code.as_ptr() as usize;
    start..start + token.len()
}
