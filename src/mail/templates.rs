pub const RESET_PASSWORD_SUBJECT: &str = "Password Reset";

/// Link the frontend serves for entering a new password.
pub fn reset_password_link(link_base: &str, token: &str) -> String {
    format!("{}/reset-password/{}", link_base.trim_end_matches('/'), token)
}

pub fn reset_password_email(link_base: &str, token: &str) -> String {
    let link = reset_password_link(link_base, token);
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif;">
    <h2>Reset your password</h2>
    <p>We received a request to reset the password of your account.</p>
    <p><a href="{link}">Click here to choose a new password</a></p>
    <p>The link expires in one hour. If you did not ask for a reset, ignore this email.</p>
  </body>
</html>
"#
    )
}
