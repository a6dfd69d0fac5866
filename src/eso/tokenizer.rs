//! Line tokenizer for the ESO wire format.
//!
//! An ESO row is a comma-separated line whose leading field is an integer
//! report code. Everything from the first `!` onward is a comment; data
//! rows never carry one, dictionary rows use it for the reporting
//! frequency, so the comment is kept separately rather than discarded.

use crate::error::{Error, Result};

/// One tokenized ESO line: report code, remaining fields, trailing comment.
#[derive(Debug, Clone)]
pub struct TokenizedLine {
    pub report_code: u32,
    pub fields: Vec<String>,
    pub comment: Option<String>,
}

/// Tokenize a single raw line.
///
/// Fails if the leading field does not parse as an integer report code,
/// which indicates a structurally corrupt file.
pub fn tokenize(line: &str, line_number: usize) -> Result<TokenizedLine> {
    let (body, comment) = match line.split_once('!') {
        Some((body, comment)) => {
            let comment = comment.trim();
            (
                body,
                (!comment.is_empty()).then(|| comment.to_string()),
            )
        }
        None => (line, None),
    };

    let mut fields: Vec<String> = body.split(',').map(|f| f.trim().to_string()).collect();
    // split always yields at least one element
    let code_token = fields.remove(0);
    let report_code = code_token.parse::<u32>().map_err(|_| Error::MalformedReportCode {
        line_number,
        token: code_token.clone(),
    })?;

    Ok(TokenizedLine {
        report_code,
        fields,
        comment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_data_row() {
        let tok = tokenize("7, 21.5, 3.0", 12).unwrap();
        assert_eq!(tok.report_code, 7);
        assert_eq!(tok.fields, vec!["21.5", "3.0"]);
        assert_eq!(tok.comment, None);
    }

    #[test]
    fn test_tokenize_dictionary_row_keeps_comment() {
        let tok = tokenize(
            "7,1,Environment,Site Outdoor Air Drybulb Temperature [C] !Hourly",
            2,
        )
        .unwrap();
        assert_eq!(tok.report_code, 7);
        assert_eq!(
            tok.fields,
            vec![
                "1",
                "Environment",
                "Site Outdoor Air Drybulb Temperature [C]"
            ]
        );
        assert_eq!(tok.comment.as_deref(), Some("Hourly"));
    }

    #[test]
    fn test_tokenize_comment_with_commas() {
        let tok = tokenize("51,7,ZONE ONE,Zone Mean Air Temperature [C] !Daily [Value,Min,Hour,Minute,Max,Hour,Minute]", 9).unwrap();
        assert_eq!(tok.fields.len(), 3);
        assert_eq!(
            tok.comment.as_deref(),
            Some("Daily [Value,Min,Hour,Minute,Max,Hour,Minute]")
        );
    }

    #[test]
    fn test_tokenize_trims_whitespace() {
        let tok = tokenize("2, 1,12,21,0, 1, 0.00,60.00,WinterDesignDay", 100).unwrap();
        assert_eq!(tok.report_code, 2);
        assert_eq!(tok.fields[0], "1");
        assert_eq!(tok.fields[5], "0.00");
        assert_eq!(tok.fields[7], "WinterDesignDay");
    }

    #[test]
    fn test_tokenize_malformed_report_code() {
        let err = tokenize("not-a-code,1,2", 42).unwrap_err();
        match err {
            Error::MalformedReportCode { line_number, token } => {
                assert_eq!(line_number, 42);
                assert_eq!(token, "not-a-code");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tokenize_empty_comment_is_none() {
        let tok = tokenize("7,1,Environment,Zone Temperature [C] !", 5).unwrap();
        assert_eq!(tok.comment, None);
    }
}
