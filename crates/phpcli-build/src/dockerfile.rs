#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Workdir(String),
    Copy { from: String, to: String },
    Run(String),
    Volume(String),
}

/// Ordered Dockerfile build instructions.
///
/// `FROM` is held separately and always rendered first, the rest keep
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dockerfile {
    from: Option<String>,
    instructions: Vec<Instruction>,
}

impl Dockerfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_from(&mut self, image: impl Into<String>) -> &mut Self {
        self.from = Some(image.into());
        self
    }

    pub fn set_workdir(&mut self, dir: impl Into<String>) -> &mut Self {
        self.push(Instruction::Workdir(dir.into()))
    }

    pub fn copy(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.push(Instruction::Copy {
            from: from.into(),
            to: to.into(),
        })
    }

    pub fn run(&mut self, command: impl Into<String>) -> &mut Self {
        self.push(Instruction::Run(command.into()))
    }

    pub fn add_volume(&mut self, path: impl Into<String>) -> &mut Self {
        self.push(Instruction::Volume(path.into()))
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    fn push(&mut self, instruction: Instruction) -> &mut Self {
        self.instructions.push(instruction);
        self
    }

    pub fn render(&self) -> String {
        let from = self.from.iter().map(|image| format!("FROM {image}"));
        let body = self.instructions.iter().map(|instruction| match instruction {
            Instruction::Workdir(dir) => format!("WORKDIR {dir}"),
            Instruction::Copy { from, to } => format!("COPY {from} {to}"),
            Instruction::Run(command) => format!("RUN {command}"),
            Instruction::Volume(path) => format!("VOLUME {path}"),
        });

        let mut out = from.chain(body).collect::<Vec<_>>().join("\n");
        out.push('\n');
        out
    }
}
