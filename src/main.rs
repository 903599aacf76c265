use rask_log_engine::app;

fn main() -> anyhow::Result<()> {
    app::main()
}
