#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

pub struct SlashCommand {
    command: String,
    rest: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let (prefix, rest) = text
            .split_once(char::is_whitespace)
            .unwrap_or((text, ""));
        let rest = rest.trim_start();

        let cmd = SlashCommand {
            command: prefix.to_string(),
            rest: rest.to_string(),
            args: rest
                .split_whitespace()
                .map(|e| return e.to_string())
                .collect(),
        };
        if cmd.is_quit()
            || cmd.is_new_chat()
            || cmd.is_camera()
            || cmd.is_upload()
            || cmd.is_delete_attachment()
            || cmd.is_theme()
            || cmd.is_claim()
            || cmd.is_referral()
            || cmd.is_copy_referral()
            || cmd.is_credits()
            || cmd.is_logout()
            || cmd.is_help()
        {
            return Some(cmd);
        }

        return None;
    }

    /// Everything after the command word, inner whitespace untouched.
    pub fn rest(&self) -> String {
        return self.rest.to_string();
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_new_chat(&self) -> bool {
        return ["/n", "/new"].contains(&self.command.as_str());
    }

    pub fn is_camera(&self) -> bool {
        return ["/cam", "/camera"].contains(&self.command.as_str());
    }

    pub fn is_upload(&self) -> bool {
        return ["/u", "/upload"].contains(&self.command.as_str());
    }

    pub fn is_delete_attachment(&self) -> bool {
        return ["/d", "/delete"].contains(&self.command.as_str());
    }

    pub fn is_theme(&self) -> bool {
        return ["/t", "/theme"].contains(&self.command.as_str());
    }

    pub fn is_claim(&self) -> bool {
        return ["/claim"].contains(&self.command.as_str());
    }

    pub fn is_referral(&self) -> bool {
        return ["/ref", "/referral"].contains(&self.command.as_str());
    }

    pub fn is_copy_referral(&self) -> bool {
        return ["/c", "/copy"].contains(&self.command.as_str());
    }

    pub fn is_credits(&self) -> bool {
        return ["/credits"].contains(&self.command.as_str());
    }

    pub fn is_logout(&self) -> bool {
        return ["/logout"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }
}
