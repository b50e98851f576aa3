//! Sub-command registry and dispatch for multi-command programs.
//!
//! A [`Registry`] maps command names to handlers. `main` registers its
//! commands, then hands `argv[1]` to [`Registry::dispatch`]; each handler
//! builds its own [`ArgTable`] and uses the `make_*` helpers here for its
//! help and error text.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::dstr::DStr;
use crate::error::{Error, Result};
use crate::sort::mgsort;
use crate::table::ArgTable;

/// Opaque per-command state handed back to the handler.
pub type CmdContext = Arc<dyn Any + Send + Sync>;

/// Command handler: receives the full argument vector, an output sink and
/// the invocation details; returns the process exit status.
pub type CmdFn = Arc<dyn Fn(&[String], &mut DStr, &Invocation<'_>) -> i32 + Send + Sync>;

/// What a handler gets besides its arguments.
pub struct Invocation<'a> {
    pub registry: &'a Registry,
    pub ctx: Option<&'a CmdContext>,
}

#[derive(Clone)]
pub struct CmdInfo {
    pub name: String,
    pub description: String,
    pub handler: CmdFn,
    pub ctx: Option<CmdContext>,
}

impl fmt::Debug for CmdInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CmdInfo")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("ctx", &self.ctx.is_some())
            .finish()
    }
}

/// Program name and version shown in banners and usage lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub tag: String,
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} v{}.{}.{}.{}",
            self.name, self.major, self.minor, self.patch, self.tag
        )
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    module: Module,
    cmds: HashMap<String, CmdInfo>,
}

impl Registry {
    pub fn new(name: &str) -> Self {
        Registry {
            module: Module {
                name: name.to_string(),
                ..Module::default()
            },
            cmds: HashMap::new(),
        }
    }

    pub fn version(mut self, major: u32, minor: u32, patch: u32, tag: &str) -> Self {
        self.module.major = major;
        self.module.minor = minor;
        self.module.patch = patch;
        self.module.tag = tag.to_string();
        self
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    /// Add a command, replacing any command already registered as `name`.
    pub fn register<F>(&mut self, name: &str, handler: F, description: &str, ctx: Option<CmdContext>)
    where
        F: Fn(&[String], &mut DStr, &Invocation<'_>) -> i32 + Send + Sync + 'static,
    {
        let info = CmdInfo {
            name: name.to_string(),
            description: description.to_string(),
            handler: Arc::new(handler),
            ctx,
        };
        let replaced = self.cmds.insert(name.to_string(), info).is_some();
        tracing::debug!(name, replaced, "registered command");
    }

    /// Remove `name`; unknown names are ignored.
    pub fn unregister(&mut self, name: &str) {
        if self.cmds.remove(name).is_some() {
            tracing::debug!(name, "unregistered command");
        }
    }

    pub fn count(&self) -> usize {
        self.cmds.len()
    }

    pub fn info(&self, name: &str) -> Option<&CmdInfo> {
        self.cmds.get(name)
    }

    /// Every command, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &CmdInfo> {
        self.cmds.values()
    }

    pub fn cursor(&self) -> Cursor<'_> {
        Cursor {
            entries: self.cmds.values().collect(),
            pos: 0,
        }
    }

    /// Drop every command.
    pub fn clear(&mut self) {
        self.cmds.clear();
    }

    /// Command names in ascending order.
    pub fn sorted_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.cmds.keys().cloned().collect();
        mgsort(&mut names, |a, b| a.cmp(b))?;
        Ok(names)
    }

    /// Run the command called `name` with `argv` and return its status.
    ///
    /// An unknown name appends a message to `res` and fails with
    /// [`Error::UnknownCommand`].
    pub fn dispatch<S: AsRef<str>>(&self, name: &str, argv: &[S], res: &mut DStr) -> Result<i32> {
        let Some(info) = self.cmds.get(name) else {
            crate::catf!(res, "cannot find the command: {}\n", name);
            return Err(Error::UnknownCommand(name.to_string()));
        };

        let argv: Vec<String> = argv.iter().map(|s| s.as_ref().to_string()).collect();
        let invocation = Invocation {
            registry: self,
            ctx: info.ctx.as_ref(),
        };
        let status = (info.handler)(&argv, res, &invocation);
        tracing::debug!(name, status, "command finished");
        Ok(status)
    }

    /// The banner printed when the program is run without a command.
    pub fn make_get_help_msg(&self, ds: &mut DStr) {
        crate::catf!(ds, "{}\n", self.module);
        crate::catf!(
            ds,
            "Please type '{} help' for more information.\n",
            self.module.name
        );
    }

    /// Full help for `cmd_name`: description, usage line and glossary.
    pub fn make_help_msg(&self, ds: &mut DStr, cmd_name: &str, table: &ArgTable) {
        let description = self.info(cmd_name).map_or("", |c| c.description.as_str());
        crate::catf!(ds, "{}: {}\n", cmd_name, description);
        crate::catf!(ds, "Usage:\n  {}", self.module.name);
        table.print_syntaxv(ds, "\n \nAvailable options:\n");
        table.print_glossary(ds, 4, 23);
        ds.cat_char('\n');
    }

    /// The errors from the last parse of `table`, then a usage line.
    pub fn make_syntax_err_msg(&self, ds: &mut DStr, table: &ArgTable) {
        table.print_errors(ds, &self.module.name);
        crate::catf!(ds, "Usage: \n  {}", self.module.name);
        table.print_syntaxv(ds, "\n");
        ds.cat_char('\n');
    }

    /// Handle the two early exits of a command handler.
    ///
    /// A help request wins over parse errors. Returns the exit status when
    /// one of them applied and `None` when the command should go ahead.
    pub fn make_syntax_err_help_msg(
        &self,
        ds: &mut DStr,
        cmd_name: &str,
        help_count: usize,
        nerrors: usize,
        table: &ArgTable,
    ) -> Option<i32> {
        if help_count > 0 {
            self.make_help_msg(ds, cmd_name, table);
            return Some(0);
        }
        if nerrors > 0 {
            self.make_syntax_err_msg(ds, table);
            return Some(1);
        }
        None
    }
}

/// A position within a [`Registry`] snapshot.
///
/// A fresh cursor sits on the first command, if any.
#[derive(Debug)]
pub struct Cursor<'a> {
    entries: Vec<&'a CmdInfo>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Move to the next command; false once past the last one.
    pub fn advance(&mut self) -> bool {
        if self.pos < self.entries.len() {
            self.pos += 1;
        }
        self.pos < self.entries.len()
    }

    pub fn key(&self) -> Option<&'a str> {
        self.value().map(|c| c.name.as_str())
    }

    pub fn value(&self) -> Option<&'a CmdInfo> {
        self.entries.get(self.pos).copied()
    }

    /// Move to the command called `name`. The position is unchanged when
    /// there is no such command.
    pub fn search(&mut self, name: &str) -> bool {
        match self.entries.iter().position(|c| c.name == name) {
            Some(pos) => {
                self.pos = pos;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lit::Lit;
    use crate::str::Str;

    fn ok(_: &[String], res: &mut DStr, _: &Invocation<'_>) -> i32 {
        res.cat("ok");
        0
    }

    fn echo(argv: &[String], res: &mut DStr, _: &Invocation<'_>) -> i32 {
        res.cat(&argv.join(" "));
        7
    }

    #[test]
    fn register_lookup_unregister() {
        let mut reg = Registry::new("app");
        reg.register("list", ok, "list things", None);
        reg.register("help", echo, "show help", None);
        assert_eq!(reg.count(), 2);

        reg.unregister("list");
        reg.unregister("list");
        assert!(reg.info("list").is_none());
        assert_eq!(reg.count(), 1);

        let mut res = DStr::new();
        assert_eq!(reg.dispatch("help", &["app", "help", "x"], &mut res).unwrap(), 7);
        assert_eq!(res.as_str(), "app help x");
    }

    #[test]
    fn reregister_replaces() {
        let mut reg = Registry::new("app");
        reg.register("run", ok, "first", None);
        reg.register("run", echo, "second", None);
        assert_eq!(reg.count(), 1);
        assert_eq!(reg.info("run").unwrap().description, "second");
    }

    #[test]
    fn unknown_command() {
        let reg = Registry::new("app");
        let mut res = DStr::new();
        let err = reg.dispatch("frob", &["app", "frob"], &mut res).unwrap_err();
        assert!(matches!(err, Error::UnknownCommand(ref n) if n == "frob"));
        assert_eq!(res.as_str(), "cannot find the command: frob\n");
    }

    #[test]
    fn context_reaches_handler() {
        let mut reg = Registry::new("app");
        let ctx: CmdContext = Arc::new(41_i32);
        reg.register(
            "ctx",
            |_: &[String], _: &mut DStr, inv: &Invocation<'_>| {
                inv.ctx.and_then(|c| c.downcast_ref::<i32>()).map_or(-1, |v| v + 1)
            },
            "reads its context",
            Some(ctx),
        );
        let mut res = DStr::new();
        assert_eq!(reg.dispatch("ctx", &["app", "ctx"], &mut res).unwrap(), 42);
    }

    #[test]
    fn cursor_walks_every_command() {
        let mut reg = Registry::new("app");
        for name in ["c", "a", "b"] {
            reg.register(name, ok, "", None);
        }

        let mut cur = reg.cursor();
        let mut seen = Vec::new();
        loop {
            seen.push(cur.key().unwrap().to_string());
            if !cur.advance() {
                break;
            }
        }
        seen.sort();
        assert_eq!(seen, ["a", "b", "c"]);
        assert!(cur.value().is_none());

        assert!(cur.search("b"));
        assert_eq!(cur.value().unwrap().name, "b");
        assert!(!cur.search("zz"));
        assert_eq!(cur.key(), Some("b"));

        assert_eq!(reg.sorted_names().unwrap(), ["a", "b", "c"]);
        reg.clear();
        assert_eq!(reg.count(), 0);
        assert!(reg.cursor().key().is_none());
    }

    #[test]
    fn help_and_banner_text() {
        let mut reg = Registry::new("app").version(1, 2, 3, "beta");
        reg.register("list", ok, "list all options", None);

        let mut ds = DStr::new();
        reg.make_get_help_msg(&mut ds);
        assert_eq!(
            ds.as_str(),
            "app v1.2.3.beta\nPlease type 'app help' for more information.\n"
        );

        let mut table = ArgTable::new(5).unwrap();
        table.add(Str::required(None, None, "list", None).unwrap());
        table.add(Lit::optional("h", "help", "output usage information"));

        let mut ds = DStr::new();
        assert_eq!(reg.make_syntax_err_help_msg(&mut ds, "list", 1, 3, &table), Some(0));
        assert_eq!(
            ds.as_str(),
            "list: list all options\n\
             Usage:\n  app list [-h|--help]\n \n\
             Available options:\n    \
             -h, --help              output usage information\n\n"
        );
    }

    #[test]
    fn syntax_errors_and_pass_through() {
        let reg = Registry::new("app");
        let mut table = ArgTable::new(5).unwrap();
        table.add(Lit::optional("h", "help", None));

        let mut ds = DStr::new();
        let nerrors = table.parse_with(&["app", "-x"], &Default::default());
        assert_eq!(reg.make_syntax_err_help_msg(&mut ds, "t", 0, nerrors, &table), Some(1));
        assert_eq!(
            ds.as_str(),
            "app: invalid option \"-x\"\nUsage: \n  app [-h|--help]\n\n"
        );

        let mut ds = DStr::new();
        assert_eq!(reg.make_syntax_err_help_msg(&mut ds, "t", 0, 0, &table), None);
        assert!(ds.is_empty());
    }
}
