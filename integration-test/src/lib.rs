//! Fixture application for the integration tests.
//!
//! Registers the commands of a small multi-command program (`help`, `list`,
//! `version`) and runs them in-process the way its `main` would:
//! - no command: print the "get help" banner
//! - otherwise: dispatch `argv[1]` with the whole `argv`

use argtable::{
    ArgTable, Csi, DStr, Date, Dbl, File, Int, Invocation, Lit, Registry, Rex, Str,
};

pub const APP_NAME: &str = "app";

pub const APP_OK: i32 = 0;
pub const APP_FAIL: i32 = 1;
pub const APP_ERR_UNKNOWN_CMD: i32 = 3;

/// Status and text produced by one run of the fixture.
#[derive(Debug)]
pub struct Outcome {
    pub status: i32,
    pub output: String,
}

/// The fixture's command registry.
pub fn registry() -> Registry {
    let mut reg = Registry::new(APP_NAME).version(1, 2, 3, "rc1");
    reg.register("help", cmd_help, "output usage information", None);
    reg.register("version", cmd_version, "output the version", None);
    reg.register("list", cmd_list, "list all command-line options", None);
    reg
}

/// Run the fixture with a full `argv` (`argv[0]` is the program name).
pub fn run(argv: &[&str]) -> Outcome {
    let reg = registry();
    let mut res = DStr::new();

    let Some(name) = argv.get(1) else {
        reg.make_get_help_msg(&mut res);
        return Outcome {
            status: APP_OK,
            output: res.to_string(),
        };
    };

    let status = match reg.dispatch(name, argv, &mut res) {
        Ok(status) => status,
        Err(e) => e.exit_code(),
    };
    res.cat_char('\n');
    Outcome {
        status,
        output: res.to_string(),
    }
}

/// Close out a handler: a table that could not be built is reported in
/// `res` and turned into its exit status.
fn finish(res: &mut DStr, status: argtable::Result<i32>) -> i32 {
    status.unwrap_or_else(|e| {
        argtable::catf!(res, "{}", e);
        e.exit_code()
    })
}

fn cmd_version(argv: &[String], res: &mut DStr, inv: &Invocation<'_>) -> i32 {
    let status = try_version(argv, res, inv);
    finish(res, status)
}

fn try_version(argv: &[String], res: &mut DStr, inv: &Invocation<'_>) -> argtable::Result<i32> {
    let mut table = ArgTable::new(20)?;
    table.add(Str::required(None, None, "version", None)?);
    let help = table.add(Lit::optional("h", "help", "output usage information"));

    let nerrors = table.parse(argv);
    if let Some(status) =
        inv.registry
            .make_syntax_err_help_msg(res, "version", table[help].count, nerrors, &table)
    {
        return Ok(status);
    }

    let m = inv.registry.module();
    argtable::catf!(res, "v{}.{}.{}.{}", m.major, m.minor, m.patch, m.tag);
    Ok(APP_OK)
}

fn cmd_list(argv: &[String], res: &mut DStr, inv: &Invocation<'_>) -> i32 {
    let status = try_list(argv, res, inv);
    finish(res, status)
}

fn try_list(argv: &[String], res: &mut DStr, inv: &Invocation<'_>) -> argtable::Result<i32> {
    let mut table = ArgTable::new(20)?;
    table.add(Str::required(None, None, "list", None)?);
    let intopt = table.add(Int::optional("i", "intopt", "<n>", "an integer option")?);
    let stropt = table.add(Str::optional("s", "stropt", "<s>", "a string option")?);
    let dblopt = table.add(Dbl::optional("d", "dblopt", "<f>", "a double option")?);
    let boolopt = table.add(Lit::optional("b", "boolopt", "a boolean option"));
    let fileopt = table.add(File::optional("f", "fileopt", "<file>", "a file option")?);
    let rgb = table.add(Csi::optional("r", "rgb", "<r,g,b>", 3, "a color triple")?);
    let when = table.add(Date::optional("w", "when", "%Y-%m-%d", None, "a date")?);
    let mode = table.add(Rex::optional("m", "mode", "fast|slow", "<mode>", true, "fast or slow")?);
    let help = table.add(Lit::optional("h", "help", "output usage information"));

    table[intopt].ival[0] = 42;
    table[stropt].sval[0] = "default".to_string();
    table[dblopt].dval[0] = 1.5;
    table[fileopt].filename[0] = "default.txt".to_string();

    let nerrors = table.parse(argv);
    if let Some(status) =
        inv.registry
            .make_syntax_err_help_msg(res, "list", table[help].count, nerrors, &table)
    {
        return Ok(status);
    }

    argtable::catf!(res, "intopt = {}\n", table[intopt].ival[0]);
    argtable::catf!(res, "stropt = {}\n", table[stropt].sval[0]);
    argtable::catf!(res, "dblopt = {:.2}\n", table[dblopt].dval[0]);
    argtable::catf!(
        res,
        "boolopt = {}\n",
        if table[boolopt].count > 0 { "true" } else { "false" }
    );
    let file = &table[fileopt];
    if file.count > 0 {
        argtable::catf!(
            res,
            "fileopt = {} (base {}, ext {})\n",
            file.filename[0],
            file.basename[0],
            file.extension[0]
        );
    } else {
        res.cat("fileopt = no file\n");
    }
    if let Some(v) = table[rgb].values().first() {
        argtable::catf!(res, "rgb = {:?}\n", v);
    }
    if let Some(d) = table[when].values().first() {
        argtable::catf!(res, "when = {}\n", d.format("%Y-%m-%d"));
    }
    if let Some(m) = table[mode].values().first() {
        argtable::catf!(res, "mode = {}\n", m);
    }
    Ok(APP_OK)
}

fn cmd_help(argv: &[String], res: &mut DStr, inv: &Invocation<'_>) -> i32 {
    let status = try_help(argv, res, inv);
    finish(res, status)
}

fn try_help(argv: &[String], res: &mut DStr, inv: &Invocation<'_>) -> argtable::Result<i32> {
    let mut table = ArgTable::new(20)?;
    table.add(Str::required(None, None, "help", None)?);
    let cmd_name = table.add(Str::optional(None, None, "<command>", None)?);
    let help = table.add(Lit::optional("h", "help", "output usage information"));

    let nerrors = table.parse(argv);
    if let Some(status) =
        inv.registry
            .make_syntax_err_help_msg(res, "help", table[help].count, nerrors, &table)
    {
        return Ok(status);
    }

    let Some(name) = table[cmd_name].values().first() else {
        return Ok(list_commands(res, inv.registry));
    };

    if inv.registry.info(name).is_none() {
        argtable::catf!(res, "Unknown command: {}\n", name);
        inv.registry.make_get_help_msg(res);
        return Ok(APP_ERR_UNKNOWN_CMD);
    }
    inv.registry.dispatch(name, &[APP_NAME, name.as_str(), "--help"], res)
}

fn list_commands(res: &mut DStr, reg: &Registry) -> i32 {
    res.cat("Usage:\n");
    argtable::catf!(res, "  {} <command> [options] [args]\n\n", APP_NAME);
    res.cat("Available commands:\n");

    let names = match reg.sorted_names() {
        Ok(names) => names,
        Err(e) => return e.exit_code(),
    };
    let width = names.iter().map(String::len).max().unwrap_or(0);
    for name in &names {
        let description = reg.info(name).map_or("", |c| c.description.as_str());
        argtable::catf!(res, "  {:<width$}  {}\n", name, description, width = width);
    }

    argtable::catf!(
        res,
        "\nType \"{} help <command>\" for help on a specific command.\n",
        APP_NAME
    );
    APP_OK
}
