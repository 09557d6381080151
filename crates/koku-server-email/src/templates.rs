// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::EmailRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
	pub subject: String,
	pub html: String,
	pub text: String,
}

pub fn render_email(request: &EmailRequest, base_url: &str) -> RenderedEmail {
	match request {
		EmailRequest::NewUserLogin {
			username,
			user_uuid,
			reset_token,
		} => {
			let link = format!("{base_url}/password-reset?user={user_uuid}&token={reset_token}");
			let subject = "Welcome to Koku: set your password".to_string();

			let text = format!(
				"Hello {username},\n\n\
				 An account has been created for you on Koku.\n\n\
				 Set your password here:\n{link}\n\n\
				 The link can be used once. If you did not expect this email you can ignore it."
			);

			let name = escape_html(username);
			let html = format!(
				"<p>Hello {name},</p>\
				 <p>An account has been created for you on Koku.</p>\
				 <p><a href=\"{link}\">Set your password</a></p>\
				 <p>The link can be used once. If you did not expect this email you can ignore it.</p>"
			);

			RenderedEmail {
				subject,
				html,
				text,
			}
		}
	}
}

fn escape_html(input: &str) -> String {
	let mut out = String::with_capacity(input.len());
	for c in input.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#x27;"),
			_ => out.push(c),
		}
	}
	out
}
