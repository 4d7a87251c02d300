use std::fmt;

/// Steps of ordered startup, in creation order.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Input,
    FileIo,
    Graphics,
    ResourceManager,
    Scene,
    World,
}

impl Stage {
    /// All stages in creation order.
    pub const ORDER: [Stage; 6] = [
        Stage::Input,
        Stage::FileIo,
        Stage::Graphics,
        Stage::ResourceManager,
        Stage::Scene,
        Stage::World,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Input => "input",
            Stage::FileIo => "file io",
            Stage::Graphics => "graphics",
            Stage::ResourceManager => "resource manager",
            Stage::Scene => "scene",
            Stage::World => "world",
        };
        f.write_str(name)
    }
}
