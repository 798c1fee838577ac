//! A shell script that stands in for pandoc: it echoes its input (stdin or
//! the positional file) to `--output=` or stdout, and logs every invocation.

use std::fs;
use std::os::unix::fs::PermissionsExt as _;
use std::path::{Path, PathBuf};

pub struct PandocStub {
    pub bin: PathBuf,
    pub log: PathBuf,
}

#[derive(Debug, Clone, Copy, Default)]
pub enum StubBehavior {
    #[default]
    Echo,
    FailOnEpub,
}

impl PandocStub {
    pub fn install(dir: &Path, behavior: StubBehavior) -> anyhow::Result<Self> {
        let bin = dir.join("pandoc-stub.sh");
        let log = dir.join("pandoc-stub.log");

        let fail = match behavior {
            StubBehavior::Echo => "",
            StubBehavior::FailOnEpub => {
                "case \"$*\" in *--to=epub*) echo \"epub writer exploded\" >&2; exit 3;; esac\n"
            }
        };
        let script = format!(
            "#!/bin/sh\n\
echo \"$*\" >> '{log}'\n\
{fail}\
out=\"\"\n\
input=\"\"\n\
for arg in \"$@\"; do\n\
  case \"$arg\" in\n\
    --output=*) out=\"${{arg#--output=}}\" ;;\n\
    -*) ;;\n\
    *) if [ -z \"$input\" ]; then input=\"$arg\"; fi ;;\n\
  esac\n\
done\n\
if [ -z \"$input\" ]; then input=\"-\"; fi\n\
if [ -n \"$out\" ]; then cat \"$input\" > \"$out\"; else cat \"$input\"; fi\n",
            log = log.display(),
        );
        fs::write(&bin, script)?;
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755))?;

        Ok(Self { bin, log })
    }

    /// One line per invocation, with all arguments joined by spaces.
    pub fn invocations(&self) -> anyhow::Result<Vec<String>> {
        if !self.log.exists() {
            return Ok(Vec::new());
        }
        Ok(fs::read_to_string(&self.log)?
            .lines()
            .map(str::to_owned)
            .collect())
    }
}
