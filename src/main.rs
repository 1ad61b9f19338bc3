use stageview::{sample_scene, ViewerApp};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // A real scene loader would hand over its composed node tree here;
    // the bundled sample keeps the viewer useful on its own.
    let mut app = ViewerApp::new()?;
    app.set_scene(sample_scene());
    app.run()
}
