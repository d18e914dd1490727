//! 命令注册表
//!
//! 支持完整命令、快捷键、别名和前缀补全

use crate::command::{CommandContext, CommandFn, CommandFuture};
use crate::commands;
use futures::FutureExt;
use std::collections::HashMap;
use std::path::Path;

/// 内置命令
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    // 选择
    Select,

    // 绘图
    DrawLine,
    DrawCircle,
    DrawArc,
    DrawPolyline,
    DrawRectangle,
    DrawPoint,
    DrawText,
    DrawHatch,

    // 修改
    Move,
    Copy,
    Rotate,
    Scale,
    Mirror,
    Erase,

    // 视图
    Zoom,
}

impl CommandKind {
    /// 显示名称
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Select => "Select",
            CommandKind::DrawLine => "Line",
            CommandKind::DrawCircle => "Circle",
            CommandKind::DrawArc => "Arc",
            CommandKind::DrawPolyline => "Polyline",
            CommandKind::DrawRectangle => "Rectangle",
            CommandKind::DrawPoint => "Point",
            CommandKind::DrawText => "Text",
            CommandKind::DrawHatch => "Hatch",
            CommandKind::Move => "Move",
            CommandKind::Copy => "Copy",
            CommandKind::Rotate => "Rotate",
            CommandKind::Scale => "Scale",
            CommandKind::Mirror => "Mirror",
            CommandKind::Erase => "Erase",
            CommandKind::Zoom => "Zoom",
        }
    }

    /// 命令入口
    pub fn runner(&self) -> CommandFn {
        match self {
            CommandKind::Select => |ctx: CommandContext| -> CommandFuture {
                commands::select::run(ctx).boxed_local()
            },
            CommandKind::DrawLine => |ctx: CommandContext| -> CommandFuture {
                commands::draw_line::run(ctx).boxed_local()
            },
            CommandKind::DrawCircle => |ctx: CommandContext| -> CommandFuture {
                commands::draw_circle::run(ctx).boxed_local()
            },
            CommandKind::DrawArc => |ctx: CommandContext| -> CommandFuture {
                commands::draw_arc::run(ctx).boxed_local()
            },
            CommandKind::DrawPolyline => |ctx: CommandContext| -> CommandFuture {
                commands::draw_polyline::run(ctx).boxed_local()
            },
            CommandKind::DrawRectangle => |ctx: CommandContext| -> CommandFuture {
                commands::draw_rectangle::run(ctx).boxed_local()
            },
            CommandKind::DrawPoint => |ctx: CommandContext| -> CommandFuture {
                commands::draw_point::run(ctx).boxed_local()
            },
            CommandKind::DrawText => |ctx: CommandContext| -> CommandFuture {
                commands::draw_text::run(ctx).boxed_local()
            },
            CommandKind::DrawHatch => |ctx: CommandContext| -> CommandFuture {
                commands::draw_hatch::run(ctx).boxed_local()
            },
            CommandKind::Move => |ctx: CommandContext| -> CommandFuture {
                commands::modify_move::run(ctx).boxed_local()
            },
            CommandKind::Copy => |ctx: CommandContext| -> CommandFuture {
                commands::modify_copy::run(ctx).boxed_local()
            },
            CommandKind::Rotate => |ctx: CommandContext| -> CommandFuture {
                commands::modify_rotate::run(ctx).boxed_local()
            },
            CommandKind::Scale => |ctx: CommandContext| -> CommandFuture {
                commands::modify_scale::run(ctx).boxed_local()
            },
            CommandKind::Mirror => |ctx: CommandContext| -> CommandFuture {
                commands::modify_mirror::run(ctx).boxed_local()
            },
            CommandKind::Erase => |ctx: CommandContext| -> CommandFuture {
                commands::erase::run(ctx).boxed_local()
            },
            CommandKind::Zoom => |ctx: CommandContext| -> CommandFuture {
                commands::zoom::run(ctx).boxed_local()
            },
        }
    }
}

/// 内置命令：(命令, 完整名, 快捷键)
const BUILTIN: &[(CommandKind, &str, &[&str])] = &[
    (CommandKind::DrawLine, "LINE", &["L"]),
    (CommandKind::DrawCircle, "CIRCLE", &["C"]),
    (CommandKind::DrawArc, "ARC", &["A"]),
    (CommandKind::DrawPolyline, "POLYLINE", &["PL", "PLINE"]),
    (CommandKind::DrawRectangle, "RECTANGLE", &["REC", "RECTANG"]),
    (CommandKind::DrawPoint, "POINT", &["PO"]),
    (CommandKind::DrawText, "TEXT", &["T", "DTEXT"]),
    (CommandKind::DrawHatch, "HATCH", &["H", "BH"]),
    (CommandKind::Move, "MOVE", &["M"]),
    (CommandKind::Copy, "COPY", &["CO", "CP"]),
    (CommandKind::Rotate, "ROTATE", &["RO"]),
    (CommandKind::Scale, "SCALE", &["SC"]),
    (CommandKind::Mirror, "MIRROR", &["MI"]),
    (CommandKind::Erase, "ERASE", &["E", "DELETE"]),
    (CommandKind::Select, "SELECT", &["SEL"]),
    (CommandKind::Zoom, "ZOOM", &["Z"]),
];

/// 名称的来源，决定查找优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum NameKind {
    Full,
    Shortcut,
    Alias,
}

/// 命令注册表：完整命令名、快捷键和用户别名到命令的映射
///
/// 所有名称大小写不敏感，内部统一存大写。完整名优先于快捷键，快捷键优先于别名。
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    names: HashMap<String, (NameKind, CommandKind)>,
    full_names: HashMap<CommandKind, String>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            names: HashMap::new(),
            full_names: HashMap::new(),
        };
        for &(kind, name, shortcuts) in BUILTIN {
            registry.register(kind, name, shortcuts);
        }
        registry
    }

    /// 注册（或重新注册）一个命令的完整名和快捷键
    pub fn register(&mut self, kind: CommandKind, name: &str, shortcuts: &[&str]) {
        let name = name.to_uppercase();
        self.insert(name.clone(), NameKind::Full, kind);
        self.full_names.insert(kind, name);
        for shortcut in shortcuts {
            self.insert(shortcut.to_uppercase(), NameKind::Shortcut, kind);
        }
    }

    // 低优先级的名称不覆盖高优先级的
    fn insert(&mut self, name: String, source: NameKind, kind: CommandKind) -> bool {
        match self.names.get(&name) {
            Some((existing, _)) if *existing < source => false,
            _ => {
                self.names.insert(name, (source, kind));
                true
            }
        }
    }

    /// 按完整名、快捷键或别名查找
    pub fn lookup(&self, input: &str) -> Option<CommandKind> {
        self.names
            .get(&input.trim().to_uppercase())
            .map(|&(_, kind)| kind)
    }

    /// 以 `prefix` 开头的完整命令名，按字母排序
    pub fn complete(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.trim().to_uppercase();
        let mut matches: Vec<String> = self
            .full_names
            .values()
            .filter(|name| name.starts_with(&prefix))
            .cloned()
            .collect();
        matches.sort();
        matches
    }

    pub fn command_name(&self, kind: CommandKind) -> Option<&str> {
        self.full_names.get(&kind).map(String::as_str)
    }

    /// 添加用户别名，返回是否生效
    ///
    /// 别名不能占用已有的完整名或快捷键，目标可以是任何已知名称。
    pub fn add_alias(&mut self, alias: &str, command: &str) -> bool {
        let Some(kind) = self.lookup(command) else {
            return false;
        };
        self.insert(alias.trim().to_uppercase(), NameKind::Alias, kind)
    }

    pub fn remove_alias(&mut self, alias: &str) {
        let alias = alias.trim().to_uppercase();
        if matches!(self.names.get(&alias), Some((NameKind::Alias, _))) {
            self.names.remove(&alias);
        }
    }

    /// 从文件加载别名，返回生效的条数
    ///
    /// 每行 `别名 命令`，`#` 开头为注释，无法识别的行记录警告后跳过。
    pub fn load_aliases(&mut self, path: &Path) -> Result<usize, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        let mut loaded = 0;
        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut words = line.split_whitespace();
            match (words.next(), words.next()) {
                (Some(alias), Some(command)) if self.add_alias(alias, command) => loaded += 1,
                _ => tracing::warn!("Ignoring alias line: {}", line),
            }
        }
        Ok(loaded)
    }

    /// 所有命令及其完整名，按名称排序
    pub fn commands(&self) -> Vec<(&str, CommandKind)> {
        let mut commands: Vec<_> = self
            .full_names
            .iter()
            .map(|(&kind, name)| (name.as_str(), kind))
            .collect();
        commands.sort_by_key(|&(name, _)| name);
        commands
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let registry = CommandRegistry::new();

        assert_eq!(registry.lookup("LINE"), Some(CommandKind::DrawLine));
        assert_eq!(registry.lookup("line"), Some(CommandKind::DrawLine));

        assert_eq!(registry.lookup("L"), Some(CommandKind::DrawLine));
        assert_eq!(registry.lookup("pl"), Some(CommandKind::DrawPolyline));

        assert_eq!(registry.lookup("NOTEXIST"), None);
    }

    #[test]
    fn test_complete() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.complete("PO"), vec!["POINT", "POLYLINE"]);
        assert!(registry.complete("X").is_empty());
    }

    #[test]
    fn test_alias() {
        let mut registry = CommandRegistry::new();

        assert!(registry.add_alias("LL", "LINE"));
        assert_eq!(registry.lookup("LL"), Some(CommandKind::DrawLine));

        // 不能占用已有名称，也不能指向不存在的命令
        assert!(!registry.add_alias("MOVE", "LINE"));
        assert!(!registry.add_alias("m", "LINE"));
        assert!(!registry.add_alias("XX", "NOTEXIST"));

        // 快捷键也可以作为目标
        assert!(registry.add_alias("ROT", "ro"));
        assert_eq!(registry.lookup("rot"), Some(CommandKind::Rotate));

        registry.remove_alias("LL");
        assert_eq!(registry.lookup("LL"), None);
        registry.remove_alias("L");
        assert_eq!(registry.lookup("L"), Some(CommandKind::DrawLine));
    }

    #[test]
    fn test_load_aliases() {
        let path = std::env::temp_dir().join(format!("zdraw-aliases-{}.txt", std::process::id()));
        std::fs::write(&path, "# aliases\nrr rectangle\nbogus\n").unwrap();
        let mut registry = CommandRegistry::new();
        let loaded = registry.load_aliases(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, 1);
        assert_eq!(registry.lookup("rr"), Some(CommandKind::DrawRectangle));
    }

    #[test]
    fn test_every_kind_has_a_name() {
        let registry = CommandRegistry::new();
        assert_eq!(registry.commands().len(), BUILTIN.len());
        for (_, kind) in registry.commands() {
            assert!(registry.command_name(kind).is_some());
            assert!(!kind.name().is_empty());
        }
    }
}
