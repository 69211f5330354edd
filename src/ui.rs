// UI layer: the interactive shell. Lines come from a `LineSource`
// (a `dialoguer` prompt on a terminal, any reader otherwise), are parsed
// into a `Command`, and run against a `UserApi`. Everything is printed
// through `Console`, which can target stdout or an in-memory buffer.

use std::fmt::Display;
use std::io::{self, BufRead, Stdout, Write};
use std::time::Duration;

use crossterm::style::Stylize;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::api::{Credentials, FriendRequest, Sent, User, UserApi};
use crate::command::{Command, REFERENCE};
use crate::error::{CritterError, Result};
use crate::session::Session;

/// Output sink for the shell.
///
/// A styled console colours confirmations and errors and shows a spinner
/// while a request is in flight. A plain console writes bare lines, which
/// is what tests and piped sessions want.
pub struct Console<W: Write> {
    out: W,
    styled: bool,
}

impl Console<Stdout> {
    pub fn terminal() -> Self {
        Console {
            out: io::stdout(),
            styled: true,
        }
    }
}

impl<W: Write> Console<W> {
    pub fn plain(out: W) -> Self {
        Console { out, styled: false }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn line(&mut self, msg: impl Display) -> io::Result<()> {
        writeln!(self.out, "{msg}")
    }

    pub fn success(&mut self, msg: impl Display) -> io::Result<()> {
        if self.styled {
            writeln!(self.out, "{}", msg.to_string().green())
        } else {
            self.line(msg)
        }
    }

    pub fn failure(&mut self, msg: impl Display) -> io::Result<()> {
        if self.styled {
            writeln!(self.out, "{}", msg.to_string().red())
        } else {
            self.line(msg)
        }
    }

    /// Print a progress line and, on a terminal, start a spinner under it.
    pub fn progress(&mut self, msg: &str) -> io::Result<Progress> {
        self.line(msg)?;
        self.out.flush()?;
        if !self.styled {
            return Ok(Progress(None));
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("waiting for server");
        spinner.enable_steady_tick(Duration::from_millis(100));
        Ok(Progress(Some(spinner)))
    }
}

/// Handle to an in-flight progress indicator.
pub struct Progress(Option<ProgressBar>);

impl Progress {
    pub fn done(self) {
        if let Some(spinner) = self.0 {
            spinner.finish_and_clear();
        }
    }
}

/// Where the shell reads its input from. `Ok(None)` means end of input.
pub trait LineSource {
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Keyboard input through a `dialoguer` prompt.
pub struct TerminalInput;

impl LineSource for TerminalInput {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        // `Input::interact_text()` prompts and returns the line as typed.
        match Input::<String>::new()
            .with_prompt("Enter command")
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => Ok(Some(line)),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Lines from any buffered reader, e.g. piped stdin or a test script.
pub struct ReaderInput<R> {
    reader: R,
}

impl<R: BufRead> ReaderInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderInput<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The interactive shell: owns the API client, the session and the console.
pub struct Shell<A: UserApi, W: Write> {
    api: A,
    session: Session,
    console: Console<W>,
}

impl<A: UserApi, W: Write> Shell<A, W> {
    pub fn new(api: A, console: Console<W>) -> Self {
        Shell {
            api,
            session: Session::new(),
            console,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn api_mut(&mut self) -> &mut A {
        &mut self.api
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn console(&self) -> &Console<W> {
        &self.console
    }

    /// Read and run lines until `exit` or end of input.
    pub fn run(&mut self, input: &mut impl LineSource) -> Result<()> {
        self.console
            .line("Combat Critters console. Type 'critter help' to see available commands.")?;
        while let Some(line) = input.next_line()? {
            if self.handle_line(&line)? == Flow::Exit {
                break;
            }
        }
        info!("Shell finished");
        Ok(())
    }

    /// Parse and run one line. Only console failures are returned as
    /// errors; everything else is printed and the shell carries on.
    pub fn handle_line(&mut self, line: &str) -> Result<Flow> {
        match Command::parse(line).and_then(|command| self.execute(command)) {
            Ok(flow) => Ok(flow),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                self.report(&e)?;
                Ok(Flow::Continue)
            }
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Exit => return Ok(Flow::Exit),
            Command::Help => self.show_help()?,
            Command::Register(creds) => self.handle_register(&creds)?,
            Command::Login(creds) => self.handle_login(&creds)?,
            Command::AdminUsers => self.handle_list_users()?,
            Command::AdminRemove(user_id) => self.handle_remove_user(user_id)?,
            Command::FriendsAll => self.handle_list_friends()?,
            Command::FriendsPending => self.handle_list_pending()?,
            Command::FriendsAdd(username) => self.handle_add_friend(&username)?,
        }
        Ok(Flow::Continue)
    }

    fn report(&mut self, err: &CritterError) -> Result<()> {
        if let CritterError::Remote { request, body, .. } = err {
            self.console.line(format!("Sent: {request}"))?;
            self.console.failure(err)?;
            if !body.is_empty() {
                self.console.line(body)?;
            }
        } else {
            self.console.failure(err)?;
        }
        Ok(())
    }

    /// Run one API call between a progress line and the request trace.
    fn call<T>(
        &mut self,
        progress: &str,
        request: impl FnOnce(&mut A) -> Result<Sent<T>>,
    ) -> Result<T> {
        let spinner = self.console.progress(progress)?;
        let outcome = request(&mut self.api);
        spinner.done();
        let sent = outcome?;
        self.console.line(format!("Sent: {}", sent.request))?;
        Ok(sent.body)
    }

    fn show_help(&mut self) -> Result<()> {
        self.console.line("Available commands:")?;
        for cmd in REFERENCE {
            self.console
                .line(format!("  {:<50} {}", cmd.usage, cmd.description))?;
        }
        Ok(())
    }

    fn show_users(&mut self, users: &[User], none_found: &str) -> Result<()> {
        if users.is_empty() {
            self.console.line(none_found)?;
            return Ok(());
        }
        for user in users {
            self.console
                .line(format!("id: {}, username: {}", user.id, user.username))?;
        }
        Ok(())
    }

    fn handle_register(&mut self, creds: &Credentials) -> Result<()> {
        self.call(&format!("Registering {}...", creds.username), |api| {
            api.register(creds)
        })?;
        self.console.success(format!(
            "User '{}' registered successfully, please login.",
            creds.username
        ))?;
        Ok(())
    }

    fn handle_login(&mut self, creds: &Credentials) -> Result<()> {
        let login = self.call(&format!("Logging in as {}...", creds.username), |api| {
            api.login(creds)
        })?;
        self.session.login(login.id);
        info!(user_id = login.id, "Session started");
        let name = login.username.as_deref().unwrap_or(&creds.username);
        self.console
            .success(format!("Welcome {name}! (user id {})", login.id))?;
        Ok(())
    }

    fn handle_list_users(&mut self) -> Result<()> {
        let users = self.call("Fetching users...", |api| api.list_users())?;
        self.show_users(&users, "No users found.")
    }

    fn handle_remove_user(&mut self, user_id: i64) -> Result<()> {
        self.call(&format!("Removing user {user_id}..."), |api| {
            api.remove_user(user_id)
        })?;
        self.console
            .success(format!("User {user_id} removed successfully."))?;
        Ok(())
    }

    fn handle_list_friends(&mut self) -> Result<()> {
        let user_id = self.session.require_user()?;
        let friends = self.call("Fetching friends...", |api| api.list_friends(user_id))?;
        self.show_users(&friends, "No friends found.")
    }

    fn handle_list_pending(&mut self) -> Result<()> {
        let user_id = self.session.require_user()?;
        let pending = self.call("Fetching pending friend requests...", |api| {
            api.list_pending_friends(user_id)
        })?;
        self.show_users(&pending, "No pending friend requests found.")
    }

    fn handle_add_friend(&mut self, username: &str) -> Result<()> {
        let user_id = self.session.require_user()?;
        let request = FriendRequest {
            username: username.to_string(),
        };
        self.call(&format!("Sending friend request to {username}..."), |api| {
            api.send_friend_request(user_id, &request)
        })?;
        self.console
            .success(format!("Friend request sent to '{username}'."))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApi;
    use pretty_assertions::assert_eq;

    fn output(console: &Console<Vec<u8>>) -> String {
        String::from_utf8_lossy(console.get_ref()).into_owned()
    }

    #[test]
    fn test_plain_console_writes_bare_lines() {
        let mut console = Console::plain(Vec::new());
        console.line("one").unwrap();
        console.success("two").unwrap();
        console.failure("three").unwrap();
        let progress = console.progress("four...").unwrap();
        progress.done();
        assert_eq!(output(&console), "one\ntwo\nthree\nfour...\n");
    }

    #[test]
    fn test_reader_input_yields_lines_then_none() {
        let mut input = ReaderInput::new("critter help\n\nexit".as_bytes());
        assert_eq!(input.next_line().unwrap().as_deref(), Some("critter help\n"));
        assert_eq!(input.next_line().unwrap().as_deref(), Some("\n"));
        assert_eq!(input.next_line().unwrap().as_deref(), Some("exit"));
        assert_eq!(input.next_line().unwrap(), None);
    }

    #[test]
    fn test_help_lists_every_command() {
        let mut shell = Shell::new(MockApi::new(), Console::plain(Vec::new()));
        assert_eq!(shell.handle_line("critter help").unwrap(), Flow::Continue);
        let out = output(shell.console());
        assert!(out.starts_with("Available commands:"));
        for cmd in REFERENCE {
            assert!(out.contains(cmd.usage), "missing {}", cmd.usage);
        }
        assert_eq!(shell.api().call_count(), 0);
    }

    #[test]
    fn test_remote_failure_shows_request_status_and_body() {
        let api = MockApi::new().failing_with(404, "Not Found", "no such user");
        let mut shell = Shell::new(api, Console::plain(Vec::new()));
        shell.handle_line("critter admin remove 99").unwrap();
        let out = output(shell.console());
        assert_eq!(
            out,
            "Removing user 99...\n\
             Sent: DELETE http://mock.critters.local/admin/users/99 HTTP/1.1\n\
             Request failed: 404 Not Found\n\
             no such user\n"
        );
    }

    #[test]
    fn test_transport_failure_keeps_shell_running() {
        let api = MockApi::new().offline("connection refused");
        let mut shell = Shell::new(api, Console::plain(Vec::new()));
        assert_eq!(shell.handle_line("critter admin users").unwrap(), Flow::Continue);
        assert!(output(shell.console()).contains("Request error: connection refused"));
    }

    #[test]
    fn test_exit_returns_exit_flow() {
        let mut shell = Shell::new(MockApi::new(), Console::plain(Vec::new()));
        assert_eq!(shell.handle_line("ExIt").unwrap(), Flow::Exit);
    }
}
