// Small shared helpers

use reqwest::Response;

use super::error::UpstreamError;

/// Pass the response through only when the upstream returned 2xx.
pub fn ensure_success(response: Response) -> Result<Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(UpstreamError::Status(status))
    }
}

/// Mask the local part of an email address for log output.
pub fn safe_email_log(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if local.len() > 2 => {
            format!("{}***@{}", &local[..2], domain)
        }
        Some((_, domain)) => format!("***@{}", domain),
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_long_local_part() {
        assert_eq!(safe_email_log("jdoe123@example.edu"), "jd***@example.edu");
    }

    #[test]
    fn masks_short_local_part() {
        assert_eq!(safe_email_log("ab@example.edu"), "***@example.edu");
    }

    #[test]
    fn masks_invalid_address() {
        assert_eq!(safe_email_log("not-an-email"), "***");
    }
}
