//! LaTeX Renderer
//!
//! Renders the assembled document as a scrbook/polyglossia LaTeX source.
//! One chapter per lesson: a vocabulary longtable followed by the exercises
//! as a numbered list. Arabic text is typeset through the `\ar`/`\arL`/
//! `\arpar` macros defined in the preamble.

use std::io::Write;

use crate::document::{Document, LessonSection};
use crate::error::DarsTexError;
use crate::types::{ExerciseEntry, VerseDetail, VocabularyEntry};

/// Document preamble. Fonts are resolved at TeX compile time; the renderer
/// only emits the source.
const PREAMBLE: &str = r"\documentclass[a4paper, notitlepage, DIV = 14]{scrbook}
\usepackage[x11names]{xcolor}
\usepackage{hyperref}
\hypersetup{
    colorlinks=true,
    linktoc=all,
    linkcolor=Blue4,
}
\usepackage{longtable}
\usepackage{booktabs}
\usepackage{array}

\usepackage{polyglossia}
\setmainlanguage{english}
\setotherlanguage{arabic}
\setmainfont{Charis}
\newfontfamily\arabicfont[Script=Arabic]{Noto Naskh Arabic}
\newfontfamily\arabicfonttt[Script=Arabic]{Noto Kufi Arabic}
\newcommand{\ar}[1]{{\textarabic{#1}}}
\newcommand{\arL}[1]{{{\Large \textarabic{#1}}}}
\newcommand{\arpar}[1]{
\begin{Arabic}{\Large #1}
\end{Arabic}}

\setcounter{secnumdepth}{2}

\title{Arabic Textbook Exercises and Vocabulary}
\author{Generated from textbook data}

\begin{document}
\maketitle
\tableofcontents
\clearpage

";

/// Escape LaTeX-reserved characters in a text field.
///
/// The literal backslash is replaced first so the backslashes introduced by
/// the other substitutions survive. The ﷺ ligature is wrapped in the Arabic
/// macro afterwards, so the braces it introduces stay unescaped.
///
/// ASCII control characters mean the normalizer let something through that
/// it should not have, and are rejected as a serialization error.
pub(crate) fn escape(text: &str) -> Result<String, DarsTexError> {
    if let Some(c) = text.chars().find(|c| c.is_ascii_control()) {
        return Err(DarsTexError::Serialization(format!(
            "control character U+{:04X} in text field",
            c as u32
        )));
    }

    let mut escaped = text.replace('\\', r"\textbackslash");
    for (from, to) in [
        ("&", r"\&"),
        ("%", r"\%"),
        ("$", r"\$"),
        ("#", r"\#"),
        ("_", r"\_"),
        ("{", r"\{"),
        ("}", r"\}"),
        ("^", r"\textasciicircum"),
        ("~", r"\textasciitilde"),
    ] {
        escaped = escaped.replace(from, to);
    }

    Ok(escaped.replace('ﷺ', r"(\ar{ﷺ})"))
}

/// Strip Quranic annotation marks (sajdah, hizb, pause marks) from verse
/// text so the typeset verse stays readable at textbook size.
pub(crate) fn remove_annotation_marks(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\u{06D6}'..='\u{06DC}' | '\u{06E0}'..='\u{06E8}'))
        .collect()
}

pub(crate) struct LatexRenderer;

impl LatexRenderer {
    pub(crate) fn render<W: Write>(
        &self,
        document: &Document,
        writer: &mut W,
    ) -> Result<(), DarsTexError> {
        writer.write_all(PREAMBLE.as_bytes())?;

        for lesson in &document.lessons {
            self.render_lesson(lesson, writer)?;
        }

        writer.write_all(b"\\end{document}\n")?;
        Ok(())
    }

    fn render_lesson<W: Write>(
        &self,
        lesson: &LessonSection,
        writer: &mut W,
    ) -> Result<(), DarsTexError> {
        writeln!(writer, "\\chapter{{Lesson {}}}\n", lesson.lesson_number)?;

        if !lesson.vocabulary.is_empty() {
            self.render_vocabulary(&lesson.vocabulary, writer)?;
        }

        if !lesson.exercises.is_empty() {
            writeln!(writer, "\\begin{{enumerate}}")?;
            for (exercise, detail) in &lesson.exercises {
                self.render_exercise(exercise, detail.as_ref(), writer)?;
            }
            writeln!(writer, "\\end{{enumerate}}\n")?;
        }

        Ok(())
    }

    fn render_vocabulary<W: Write>(
        &self,
        vocabulary: &[VocabularyEntry],
        writer: &mut W,
    ) -> Result<(), DarsTexError> {
        writeln!(writer, "\\renewcommand{{\\arraystretch}}{{1.3}}")?;
        writeln!(
            writer,
            "\\begin{{longtable}}{{p{{2.75cm}}p{{2.75cm}}p{{2.75cm}}p{{5.25cm}}p{{0.5cm}}}}"
        )?;
        writeln!(
            writer,
            "\\textbf{{Sing./Perf.}} & \\textbf{{Dual/Imperf.}} & \\textbf{{Pl./Verbal N.}} & \\textbf{{English}} & \\textbf{{Ch \\#}} \\\\"
        )?;
        writeln!(writer, "\\hline")?;
        writeln!(writer, "\\endhead")?;

        for entry in vocabulary {
            let cells = [
                arabic_cell(&entry.singular_or_perfect)?,
                arabic_cell(&entry.dual_or_imperfect)?,
                arabic_cell(&entry.plural_or_verbal_noun)?,
                escape(&entry.english)?,
                entry.lesson_number.to_string(),
            ];
            writeln!(writer, "{} \\\\", cells.join(" & "))?;
        }

        writeln!(writer, "\\end{{longtable}}\n")?;
        Ok(())
    }

    fn render_exercise<W: Write>(
        &self,
        exercise: &ExerciseEntry,
        detail: Option<&VerseDetail>,
        writer: &mut W,
    ) -> Result<(), DarsTexError> {
        writeln!(writer, "\\item \\arL{{\n{}\n}}", escape(&exercise.arabic_text)?)?;
        writeln!(writer, "{}\n", escape(&exercise.english)?)?;

        let reference = match exercise.reference() {
            Some(reference) => reference,
            None => return Ok(()),
        };

        match detail {
            Some(detail) => {
                writeln!(writer, "\\textbf{{[{}]}}", reference)?;
                writeln!(
                    writer,
                    "\\href{{https://quran.com/{}?startingVerse={}}}{{Quran.com}}\n",
                    reference.sura, reference.verse
                )?;
                writeln!(
                    writer,
                    "\\arpar{{\n{}\n}}\n",
                    escape(&remove_annotation_marks(&detail.arabic_text))?
                )?;
                if !detail.transliteration.is_empty() {
                    writeln!(
                        writer,
                        "\\textit{{Transliteration}}: {}\n",
                        escape(&detail.transliteration)?
                    )?;
                }
                for (translation, text) in &detail.translations {
                    writeln!(
                        writer,
                        "\\textit{{{}}}: {}\n",
                        translation.display_name(),
                        escape(text)?
                    )?;
                }
            }
            // Lookup failed or enrichment is off: label only, no empty block
            None => writeln!(writer, "\\textbf{{[{}]}}\n", reference)?,
        }

        Ok(())
    }
}

fn arabic_cell(text: &str) -> Result<String, DarsTexError> {
    if text.trim().is_empty() {
        Ok(String::new())
    } else {
        Ok(format!("\\arL{{{}}}", escape(text)?))
    }
}


#[cfg(test)]
mod escape_properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Escaped output never contains a reserved character outside of an
        /// escape sequence the escaper itself produced.
        #[test]
        fn escaped_text_has_no_bare_reserved_chars(input in "[ -~\u{0600}-\u{06FF}ﷺ]{0,64}") {
            let escaped = escape(&input).unwrap();
            for bare in ["&", "%", "$", "#", "_", "^", "~"] {
                let stripped = escaped
                    .replace(r"\textasciicircum", "")
                    .replace(r"\textasciitilde", "")
                    .replace(r"\textbackslash", "")
                    .replace(&format!("\\{}", bare), "");
                prop_assert!(!stripped.contains(bare), "bare {:?} in {:?}", bare, escaped);
            }
        }

        #[test]
        fn escaping_is_idempotent_on_clean_text(input in "[a-zA-Z0-9 \u{0621}-\u{064A}]{0,64}") {
            let once = escape(&input).unwrap();
            let twice = escape(&once).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn control_characters_always_rejected(prefix in "[a-z]{0,8}", c in 0u8..0x20) {
            let input = format!("{}{}", prefix, c as char);
            prop_assert!(escape(&input).is_err());
        }
    }
}
