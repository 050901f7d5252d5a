use crate::models::{ComplaintStatus, StatusUpdateEmailRequest};

pub const OTP_SUBJECT: &str = "Verify Your Email - GenCorpus";

/// OTP delivery email: greeting, 6-digit code, 10-minute expiry notice.
pub fn render_otp_email(code: &str, name: Option<&str>) -> String {
    let greeting = match name {
        Some(name) if !name.is_empty() => format!("Hello {name},"),
        _ => "Hello,".to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <style>
      body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; margin: 0; padding: 0; background-color: #f4f4f4; }}
      .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
      .card {{ background: white; border-radius: 10px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); overflow: hidden; }}
      .header {{ background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 30px; text-align: center; }}
      .content {{ padding: 40px 30px; text-align: center; }}
      .otp-code {{ font-size: 36px; font-weight: bold; letter-spacing: 8px; color: #667eea; background: #f0f0ff; padding: 20px 30px; border-radius: 10px; margin: 30px 0; display: inline-block; }}
      .footer {{ text-align: center; padding: 20px; color: #666; font-size: 12px; background: #f9f9f9; }}
      .warning {{ color: #888; font-size: 14px; margin-top: 20px; }}
    </style>
  </head>
  <body>
    <div class="container">
      <div class="card">
        <div class="header">
          <h1 style="margin: 0;">Email Verification</h1>
        </div>
        <div class="content">
          <p>{greeting}</p>
          <p>Your verification code is:</p>
          <div class="otp-code">{code}</div>
          <p>Enter this 6-digit code in the GenCorpus app to verify your email.</p>
          <p class="warning">This code expires in 10 minutes.</p>
          <p class="warning">If you didn't request this code, please ignore this email.</p>
        </div>
        <div class="footer">
          <p>&copy; 2025 GenCorpus Complaint Portal</p>
        </div>
      </div>
    </div>
  </body>
</html>"#
    )
}

pub fn status_update_subject(complaint_title: &str) -> String {
    format!("Complaint Status Update: {complaint_title}")
}

fn status_badge(status: ComplaintStatus) -> String {
    format!(
        r#"<span class="status-badge" style="background: {}; color: white;">{}</span>"#,
        status.color(),
        status.to_string().to_uppercase()
    )
}

/// Status-change notice: old/new status badges plus an optional resolution note.
pub fn render_status_update_email(request: &StatusUpdateEmailRequest) -> String {
    let resolution_block = match request.resolution_note.as_deref() {
        Some(note) if !note.is_empty() => format!(
            r#"<div class="resolution">
            <h3 style="margin-top: 0; color: #667eea;">Resolution Note:</h3>
            <p>{note}</p>
          </div>"#
        ),
        _ => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <style>
      body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
      .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
      .header {{ background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 30px; text-align: center; border-radius: 10px 10px 0 0; }}
      .content {{ background: #f9f9f9; padding: 30px; border-radius: 0 0 10px 10px; }}
      .status-badge {{ display: inline-block; padding: 8px 16px; border-radius: 20px; font-weight: bold; margin: 10px 5px; }}
      .footer {{ text-align: center; margin-top: 30px; color: #666; font-size: 12px; }}
      .resolution {{ background: #e8f4f8; padding: 15px; border-radius: 5px; margin-top: 15px; }}
    </style>
  </head>
  <body>
    <div class="container">
      <div class="header">
        <h1>Complaint Status Updated</h1>
      </div>
      <div class="content">
        <p>Dear {student_name},</p>
        <p>Your complaint has been updated by an administrator.</p>

        <h2 style="color: #667eea;">Complaint Details</h2>
        <p><strong>Title:</strong> {complaint_title}</p>

        <p><strong>Status Change:</strong></p>
        {old_badge}
        <span style="font-size: 20px;">&rarr;</span>
        {new_badge}

        {resolution_block}

        <p style="margin-top: 30px;">
          You can view your complaint details by logging into the portal.
        </p>
      </div>
      <div class="footer">
        <p>&copy; 2025 GenCorpus Complaint Portal</p>
        <p>This is an automated notification. Please do not reply to this email.</p>
      </div>
    </div>
  </body>
</html>"#,
        student_name = request.student_name,
        complaint_title = request.complaint_title,
        old_badge = status_badge(request.old_status),
        new_badge = status_badge(request.new_status),
    )
}
