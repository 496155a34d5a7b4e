pub type CmdResult<T> = deckhand::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod release;
pub mod verify;
pub mod version;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (deckhand::Result<serde_json::Value>, i32) {
    crate::tty::status("deckhand is working...");

    match command {
        crate::Commands::Release(args) => dispatch!(args, global, release),
        crate::Commands::Verify(args) => dispatch!(args, global, verify),
        crate::Commands::Version(args) => dispatch!(args, global, version),
    }
}
