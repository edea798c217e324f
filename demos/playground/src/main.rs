use log::info;
use pulse::glam::Quat;
use pulse::glam::Vec3;
use pulse::AppConfig;
use pulse::Application;
use pulse::ApplicationState;
use pulse::Event;
use pulse::Frame;
use pulse::KeyCode;
use pulse::LocalTransform;
use pulse::Node;
use pulse::Scene;
use pulse::Visibility;

const CONFIG_PATH: &str = "pulse.toml";

/// Radians per second.
const SPIN_SPEED: f32 = 1.0;

struct Playground {
    state: ApplicationState,
    scene: Scene,
    root: Node,
    title: String,
    frames_since_title: u64,
    seconds_since_title: f32,
}

impl Playground {
    fn new() -> pulse::Result<Self> {
        let mut scene = Scene::new();

        let root = scene.spawn();
        scene.add(root, Visibility::Visible);
        scene.add(root, LocalTransform::IDENTITY);

        let orbit = scene.spawn();
        scene.add(orbit, LocalTransform::from_position(Vec3::new(2.0, 0.0, 0.0)));
        scene.set_parent(orbit, root)?;

        let hidden = scene.spawn();
        scene.add(hidden, Visibility::Invisible);
        scene.add(
            hidden,
            LocalTransform::from_position(Vec3::new(-2.0, 0.0, 0.0)).with_scale(Vec3::splat(0.5)),
        );
        scene.set_parent(hidden, root)?;

        Ok(Self {
            state: ApplicationState::Running,
            scene,
            root,
            title: String::from("Pulse Playground"),
            frames_since_title: 0,
            seconds_since_title: 0.0,
        })
    }
}

impl Application for Playground {
    fn title(&self) -> &str {
        &self.title
    }

    fn state(&self) -> ApplicationState {
        self.state
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::CloseRequested | Event::KeyPressed(KeyCode::Escape) => {
                self.state = ApplicationState::Finished;
            }
            Event::Resized { width, height } => info!("resized to {width}x{height}"),
            _ => {}
        }
    }

    fn update(&mut self, frame: &Frame) {
        let angle = SPIN_SPEED * frame.time.delta_seconds();
        self.scene.update::<LocalTransform>(self.root, |transform| {
            transform.rotate(Quat::from_rotation_y(angle));
        });

        if frame.input.was_key_pressed(KeyCode::Space) {
            for (node, visibility) in self.scene.query::<Visibility>() {
                if node != self.root {
                    let toggled = match visibility {
                        Visibility::Invisible => Visibility::Inherit,
                        _ => Visibility::Invisible,
                    };
                    self.scene.set(node, toggled);
                }
            }
        }

        self.frames_since_title += 1;
        self.seconds_since_title += frame.time.delta_seconds();
        if self.seconds_since_title >= 1.0 {
            let fps = self.frames_since_title as f32 / self.seconds_since_title;
            self.title = format!("Pulse Playground ({fps:.0} fps)");
            self.frames_since_title = 0;
            self.seconds_since_title = 0.0;
        }
    }

    fn scene(&self) -> &Scene {
        &self.scene
    }
}

fn main() -> pulse::Result<()> {
    pulse::logger::init()?;

    let config = AppConfig::load_or_default(CONFIG_PATH)?;
    Playground::new()?.run_with_config(config)
}
