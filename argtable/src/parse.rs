//! The matching engine.
//!
//! One left-to-right pass over `argv[1..]`. Options are resolved against the
//! short and long names of every slot and scanned on the spot. Everything
//! else is collected and handed out to the positional slots once the pass
//! is over. Problems never stop the pass; they are recorded in the
//! end-marker and counted.

use crate::arg::Arg;
use crate::error::{ErrorCode, ScanError};
use crate::table::ArgTable;

/// Parser behaviour switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseConfig {
    /// Stop option processing at the first positional token instead of
    /// letting options and positionals interleave.
    pub posixly_correct: bool,
}

impl ParseConfig {
    /// Honour `POSIXLY_CORRECT` and `POSIX_ME_HARDER`.
    pub fn from_env() -> Self {
        ParseConfig {
            posixly_correct: std::env::var_os("POSIXLY_CORRECT").is_some()
                || std::env::var_os("POSIX_ME_HARDER").is_some(),
        }
    }
}

impl ArgTable {
    /// Parse `argv` using the environment's [`ParseConfig`].
    ///
    /// Returns the number of errors found; zero means every slot is
    /// satisfied.
    pub fn parse<S: AsRef<str>>(&mut self, argv: &[S]) -> usize {
        self.parse_with(argv, &ParseConfig::from_env())
    }

    pub fn parse_with<S: AsRef<str>>(&mut self, argv: &[S], config: &ParseConfig) -> usize {
        for slot in &mut self.slots {
            slot.reset();
        }
        self.end.reset();
        self.progname = argv.first().map(|s| s.as_ref().to_string()).unwrap_or_default();

        let mut positionals: Vec<&str> = Vec::new();
        if positionals.try_reserve(argv.len()).is_err() {
            self.end.push(ErrorCode::Malloc, None, None);
            return self.nerrors();
        }

        let mut options_done = false;
        let mut next = 1;
        while next < argv.len() {
            let tok = argv[next].as_ref();
            next += 1;

            if options_done {
                positionals.push(tok);
            } else if tok == "--" {
                options_done = true;
            } else if let Some(body) = tok.strip_prefix("--") {
                next = self.long_option(tok, body, argv, next);
            } else if tok.len() > 1 && tok.starts_with('-') {
                next = self.short_cluster(&tok[1..], argv, next);
            } else {
                positionals.push(tok);
                options_done = config.posixly_correct;
            }
        }

        self.distribute(&positionals);

        for (idx, slot) in self.slots.iter().enumerate() {
            if let Err(err) = slot.check() {
                self.end.push(err.into(), Some(idx), None);
            }
        }

        let nerrors = self.nerrors();
        tracing::debug!(
            progname = %self.progname,
            tokens = argv.len().saturating_sub(1),
            positionals = positionals.len(),
            nerrors,
            "parsed argument table"
        );
        nerrors
    }

    /// Handle `--name` or `--name=value`; returns the index of the next
    /// unconsumed token.
    fn long_option<S: AsRef<str>>(&mut self, tok: &str, body: &str, argv: &[S], next: usize) -> usize {
        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };
        let Some(idx) = self.find_long(name) else {
            self.end.push(ErrorCode::LongOpt, None, Some(tok));
            return next;
        };

        let hdr = self.slots[idx].header();
        let (has_value, optional_value) = (hdr.has_value, hdr.optional_value);
        match value {
            Some(_) if !has_value => {
                self.end.push(ErrorCode::UnwantedValue, Some(idx), Some(tok));
                next
            }
            Some(v) => {
                self.scan_slot(idx, Some(v));
                next
            }
            None if !has_value || optional_value => {
                self.scan_slot(idx, None);
                next
            }
            None => match argv.get(next) {
                Some(v) => {
                    self.scan_slot(idx, Some(v.as_ref()));
                    next + 1
                }
                None => {
                    self.end.push(ErrorCode::MissArg, Some(idx), Some(tok));
                    next
                }
            },
        }
    }

    /// Handle a `-abc` cluster; returns the index of the next unconsumed
    /// token.
    fn short_cluster<S: AsRef<str>>(&mut self, cluster: &str, argv: &[S], next: usize) -> usize {
        for (pos, c) in cluster.char_indices() {
            let Some(idx) = self.find_short(c) else {
                self.end.push(ErrorCode::ShortOpt(c), None, Some(format!("-{}", c).as_str()));
                continue;
            };

            let hdr = self.slots[idx].header();
            let (has_value, optional_value) = (hdr.has_value, hdr.optional_value);
            if !has_value {
                self.scan_slot(idx, None);
                continue;
            }

            // the rest of the cluster is the value: -ofile
            let rest = &cluster[pos + c.len_utf8()..];
            if !rest.is_empty() {
                self.scan_slot(idx, Some(rest));
                return next;
            }
            if optional_value {
                self.scan_slot(idx, None);
                return next;
            }
            return match argv.get(next) {
                Some(v) => {
                    self.scan_slot(idx, Some(v.as_ref()));
                    next + 1
                }
                None => {
                    self.end.push(ErrorCode::MissArg, Some(idx), Some(format!("-{}", c).as_str()));
                    next
                }
            };
        }
        next
    }

    fn find_short(&self, c: char) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.scans() && s.header().matches_short(c))
    }

    /// Exact match first, then a prefix that selects exactly one slot.
    fn find_long(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        if let Some(idx) = self
            .slots
            .iter()
            .position(|s| s.scans() && s.header().matches_long(name))
        {
            return Some(idx);
        }

        let mut candidates = self.slots.iter().enumerate().filter(|(_, s)| {
            s.scans() && s.header().long_names().any(|n| n.starts_with(name))
        });
        match (candidates.next(), candidates.next()) {
            (Some((idx, _)), None) => Some(idx),
            (Some(_), Some(_)) => {
                tracing::debug!(name, "ambiguous long option");
                None
            }
            _ => None,
        }
    }

    fn scan_slot(&mut self, idx: usize, argval: Option<&str>) {
        if let Err(err) = self.slots[idx].scan(argval) {
            self.end.push(err.into(), Some(idx), argval);
        }
    }

    /// Hand positional tokens to the positional slots in table order.
    ///
    /// A slot keeps taking tokens while it can, but once its own minimum is
    /// met it stops if the tokens left are only just enough to meet the
    /// minimums of the positional slots after it. A token a slot rejects is
    /// offered to the next slot; the rejection is only reported if no later
    /// slot accepts it.
    fn distribute(&mut self, tokens: &[&str]) {
        let order: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.scans() && s.header().is_positional())
            .map(|(idx, _)| idx)
            .collect();

        let mut t = 0;
        let mut tentative: Option<(ScanError, usize)> = None;
        for (n, &idx) in order.iter().enumerate() {
            let reserved: usize = order[n + 1..]
                .iter()
                .map(|&j| self.slots[j].header().mincount.saturating_sub(self.slots[j].count()))
                .sum();

            let slot = &mut self.slots[idx];
            while t < tokens.len() {
                let remaining = tokens.len() - t;
                if slot.count() >= slot.header().mincount && remaining <= reserved {
                    break;
                }
                match slot.scan(Some(tokens[t])) {
                    Ok(()) => {
                        tentative = None;
                        t += 1;
                    }
                    Err(err) => {
                        tentative = Some((err, idx));
                        break;
                    }
                }
            }
        }

        if let Some((err, idx)) = tentative {
            self.end.push(err.into(), Some(idx), Some(tokens[t]));
            t += 1;
        }
        for &tok in &tokens[t..] {
            self.end.push(ErrorCode::NoMatch, None, Some(tok));
        }
    }
}
