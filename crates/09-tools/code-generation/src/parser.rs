//! 源码解析
//!
//! 从 crate 根文件出发沿 `mod` 声明读取模块树，收集 `#[injectable]` 结构体、
//! `use` 导入（含通配导入）和 `impl Injectable for Type` 块，再把路径解析为限定路径。
//! 服务只取自 `implements(...)`，与宏登记到运行时类型目录的元数据一致。
//! 不在模块树中的文件与 `#[cfg(test)]` 条目不参与扫描。

use crate::error::{ScanError, ScanResult};
use crate::model::{SourceCrate, SourceDescriptor, SourceType, TypeRef};
use component_syntax::{attribute_path, service_path, InjectableArgs};
use quote::ToTokens;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Attribute, Item, ItemImpl, ItemStruct, Token, Type, UseTree, Visibility};
use tracing::{debug, info};

/// 通配导入的最大追踪层数
const GLOB_DEPTH: usize = 8;
use walkdir::WalkDir;

/// crate 源码解析器
#[derive(Debug, Clone)]
pub struct SourceParser {
    crate_name: String,
    source_dir: PathBuf,
}

impl SourceParser {
    /// 创建解析器，`crate_name` 中的 `-` 会转换为 `_`
    pub fn new(crate_name: impl AsRef<str>, source_dir: impl Into<PathBuf>) -> Self {
        Self {
            crate_name: crate_name.as_ref().replace('-', "_"),
            source_dir: source_dir.into(),
        }
    }

    /// crate 名称
    pub fn crate_name(&self) -> &str {
        &self.crate_name
    }

    /// 源码目录
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// 解析整个 crate
    pub fn parse(&self) -> ScanResult<SourceCrate> {
        let files = self.index_files();
        let root = ["lib.rs", "main.rs"]
            .iter()
            .map(PathBuf::from)
            .find(|candidate| files.contains_key(candidate))
            .ok_or_else(|| ScanError::MissingRoot {
                path: self.source_dir.clone(),
            })?;

        let mut loader = ModuleLoader {
            files: &files,
            visited: HashSet::new(),
            modules: Vec::new(),
        };
        loader.load_file(&root, Vec::new(), PathBuf::new())?;

        for (relative, _) in files.iter().filter(|(relative, _)| !loader.visited.contains(*relative)) {
            debug!("文件不在模块树中，跳过: {}", relative.display());
        }

        let source = Resolver::new(&self.crate_name, &loader.modules).build()?;
        info!(
            "解析完成: {} ({} 个模块, {} 个类型)",
            self.crate_name,
            loader.modules.len(),
            source.types.len()
        );
        Ok(source)
    }

    /// 索引源码目录下的所有 `.rs` 文件（相对路径 → 绝对路径）
    fn index_files(&self) -> HashMap<PathBuf, PathBuf> {
        WalkDir::new(&self.source_dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "rs"))
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&self.source_dir).ok()?.to_path_buf();
                Some((relative, entry.path().to_path_buf()))
            })
            .collect()
    }
}

/// 一个模块内收集到的条目
#[derive(Default)]
struct ModuleScope {
    path: Vec<String>,
    file: PathBuf,
    uses: HashMap<String, Vec<String>>,
    globs: Vec<Vec<String>>,
    declared: HashSet<String>,
    structs: Vec<ItemStruct>,
    impls: Vec<ItemImpl>,
}

struct ModuleLoader<'a> {
    files: &'a HashMap<PathBuf, PathBuf>,
    visited: HashSet<PathBuf>,
    modules: Vec<ModuleScope>,
}

impl ModuleLoader<'_> {
    fn load_file(&mut self, relative: &Path, module: Vec<String>, child_dir: PathBuf) -> ScanResult<()> {
        let Some(file) = self.files.get(relative).cloned() else {
            return Ok(());
        };
        if !self.visited.insert(relative.to_path_buf()) {
            return Ok(());
        }

        let content = std::fs::read_to_string(&file).map_err(|e| ScanError::io(&file, e))?;
        let syntax = syn::parse_file(&content).map_err(|e| ScanError::parse(&file, e))?;
        debug!("读取模块 {}: {}", display_module(&module), relative.display());
        self.collect(&syntax.items, module, &child_dir, &file)
    }

    fn collect(&mut self, items: &[Item], module: Vec<String>, child_dir: &Path, file: &Path) -> ScanResult<()> {
        let mut scope = ModuleScope {
            path: module.clone(),
            file: file.to_path_buf(),
            ..ModuleScope::default()
        };

        for item in items {
            if is_cfg_test(item_attributes(item)) {
                continue;
            }
            match item {
                Item::Use(item_use) => {
                    collect_use(&item_use.tree, Vec::new(), &mut scope.uses, &mut scope.globs);
                }
                Item::Struct(item) => {
                    scope.declared.insert(item.ident.to_string());
                    scope.structs.push(item.clone());
                }
                Item::Trait(item) => {
                    scope.declared.insert(item.ident.to_string());
                }
                Item::Impl(item) => scope.impls.push(item.clone()),
                Item::Enum(item) => {
                    scope.declared.insert(item.ident.to_string());
                }
                Item::Type(item) => {
                    scope.declared.insert(item.ident.to_string());
                }
                Item::Union(item) => {
                    scope.declared.insert(item.ident.to_string());
                }
                Item::Mod(item) => {
                    let name = item.ident.to_string();
                    scope.declared.insert(name.clone());
                    let mut child = module.clone();
                    child.push(name.clone());
                    let nested_dir = child_dir.join(&name);
                    match &item.content {
                        Some((_, items)) => self.collect(items, child, &nested_dir, file)?,
                        None => {
                            let flat = child_dir.join(format!("{name}.rs"));
                            let nested = nested_dir.join("mod.rs");
                            let relative = if self.files.contains_key(&flat) { flat } else { nested };
                            self.load_file(&relative, child, nested_dir)?;
                        }
                    }
                }
                _ => {}
            }
        }

        self.modules.push(scope);
        Ok(())
    }
}

fn item_attributes(item: &Item) -> &[Attribute] {
    match item {
        Item::Use(item) => &item.attrs,
        Item::Struct(item) => &item.attrs,
        Item::Trait(item) => &item.attrs,
        Item::Impl(item) => &item.attrs,
        Item::Enum(item) => &item.attrs,
        Item::Type(item) => &item.attrs,
        Item::Union(item) => &item.attrs,
        Item::Mod(item) => &item.attrs,
        _ => &[],
    }
}

/// 是否标注了 `#[cfg(test)]`
fn is_cfg_test(attributes: &[Attribute]) -> bool {
    attributes.iter().any(|attribute| {
        attribute.path().is_ident("cfg")
            && attribute
                .parse_args::<syn::Ident>()
                .is_ok_and(|ident| ident == "test")
    })
}

/// 收集 `use` 导入（别名 → 路径段）与通配导入的模块路径
fn collect_use(
    tree: &UseTree,
    mut prefix: Vec<String>,
    uses: &mut HashMap<String, Vec<String>>,
    globs: &mut Vec<Vec<String>>,
) {
    match tree {
        UseTree::Path(path) => {
            prefix.push(path.ident.to_string());
            collect_use(&path.tree, prefix, uses, globs);
        }
        UseTree::Name(name) => {
            let ident = name.ident.to_string();
            if ident == "self" {
                if let Some(last) = prefix.last().cloned() {
                    uses.insert(last, prefix);
                }
            } else {
                prefix.push(ident.clone());
                uses.insert(ident, prefix);
            }
        }
        UseTree::Rename(rename) => {
            let alias = rename.rename.to_string();
            if alias == "_" {
                return;
            }
            let ident = rename.ident.to_string();
            if ident != "self" {
                prefix.push(ident);
            }
            uses.insert(alias, prefix);
        }
        UseTree::Group(group) => {
            for item in &group.items {
                collect_use(item, prefix.clone(), uses, globs);
            }
        }
        UseTree::Glob(_) => globs.push(prefix),
    }
}

fn display_module(module: &[String]) -> String {
    if module.is_empty() {
        "crate".to_string()
    } else {
        format!("crate::{}", module.join("::"))
    }
}

/// 路径解析结果
enum Resolved {
    /// 本 crate 内，路径段不含 crate 名
    Local(Vec<String>),
    /// 外部路径
    External(Vec<String>),
}

impl Resolved {
    /// 在解析结果后追加剩余路径段
    fn join(self, rest: &[String]) -> Self {
        match self {
            Self::Local(base) => Self::Local([base.as_slice(), rest].concat()),
            Self::External(base) => Self::External([base.as_slice(), rest].concat()),
        }
    }
}

struct Resolver<'a> {
    crate_name: &'a str,
    modules: &'a [ModuleScope],
    index: HashMap<&'a [String], &'a ModuleScope>,
}

impl<'a> Resolver<'a> {
    fn new(crate_name: &'a str, modules: &'a [ModuleScope]) -> Self {
        let index = modules
            .iter()
            .map(|scope| (scope.path.as_slice(), scope))
            .collect();
        Self {
            crate_name,
            modules,
            index,
        }
    }

    fn resolve(&self, module: &[String], segments: &[String], follow_uses: bool) -> Resolved {
        let Some(first) = segments.first() else {
            return Resolved::External(Vec::new());
        };
        match first.as_str() {
            "crate" => Resolved::Local(segments[1..].to_vec()),
            "self" => Resolved::Local([module, &segments[1..]].concat()),
            "super" => {
                let mut base = module.to_vec();
                let mut rest = segments;
                while rest.first().is_some_and(|segment| segment == "super") {
                    base.pop();
                    rest = &rest[1..];
                }
                Resolved::Local([base.as_slice(), rest].concat())
            }
            _ => {
                let scope = self.index.get(module);
                if follow_uses {
                    if let Some(target) = scope.and_then(|scope| scope.uses.get(first)) {
                        return self.resolve(module, target, false).join(&segments[1..]);
                    }
                }
                if scope.is_some_and(|scope| scope.declared.contains(first)) {
                    return Resolved::Local([module, segments].concat());
                }
                if follow_uses {
                    if let Some(resolved) = self.resolve_glob(module, segments, GLOB_DEPTH) {
                        return resolved;
                    }
                }
                Resolved::External(segments.to_vec())
            }
        }
    }

    /// 在本 crate 模块的通配导入中查找首段名称
    ///
    /// 目标模块中声明的条目与 `use` 导入都会被通配导入带入，
    /// 目标模块自身的通配导入继续向下查找。
    fn resolve_glob(&self, module: &[String], segments: &[String], depth: usize) -> Option<Resolved> {
        let first = segments.first()?;
        let scope = self.index.get(module)?;
        scope.globs.iter().find_map(|glob| {
            let Resolved::Local(target) = self.resolve(module, glob, false) else {
                return None;
            };
            let target_scope = self.index.get(target.as_slice())?;
            if target_scope.declared.contains(first) {
                return Some(Resolved::Local([target.as_slice(), segments].concat()));
            }
            if let Some(import) = target_scope.uses.get(first) {
                return Some(self.resolve(&target, import, false).join(&segments[1..]));
            }
            if depth == 0 {
                return None;
            }
            self.resolve_glob(&target, segments, depth - 1)
        })
    }

    fn type_ref(&self, module: &[String], path: &syn::Path, object: bool) -> TypeRef {
        let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        let resolved = if path.leading_colon.is_some() {
            Resolved::External(segments)
        } else {
            self.resolve(module, &segments, true)
        };
        let (qualified, code_path) = match resolved {
            Resolved::Local(segments) => {
                let joined = segments.join("::");
                (format!("{}::{joined}", self.crate_name), format!("crate::{joined}"))
            }
            Resolved::External(segments) => {
                let joined = segments.join("::");
                (joined.clone(), joined)
            }
        };

        let arguments = match path.segments.last().map(|segment| &segment.arguments) {
            Some(syn::PathArguments::AngleBracketed(args)) => args
                .args
                .iter()
                .map(|argument| match argument {
                    syn::GenericArgument::Type(ty) => self.render_type(module, ty),
                    other => other.to_token_stream().to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };

        TypeRef {
            path: qualified,
            code_path,
            arguments,
            object,
        }
    }

    /// 渲染类型的代码形式
    fn render_type(&self, module: &[String], ty: &Type) -> String {
        match ty {
            Type::Path(type_path) if type_path.qself.is_none() => {
                self.type_ref(module, &type_path.path, false).to_code()
            }
            Type::TraitObject(_) => match service_path(ty) {
                Some(path) => self.type_ref(module, path, true).to_code(),
                None => ty.to_token_stream().to_string(),
            },
            _ => ty.to_token_stream().to_string(),
        }
    }

    /// 服务类型引用，无法表示为路径的类型（切片、引用等）报错
    fn service_ref(&self, scope: &ModuleScope, ty: &Type) -> ScanResult<TypeRef> {
        let object = !matches!(ty, Type::Path(_));
        service_path(ty)
            .map(|path| self.type_ref(&scope.path, path, object))
            .ok_or_else(|| {
                ScanError::parse(
                    &scope.file,
                    syn::Error::new(
                        ty.span(),
                        format!("不支持的服务类型: {}", ty.to_token_stream()),
                    ),
                )
            })
    }

    fn build(&self) -> ScanResult<SourceCrate> {
        let mut types: Vec<SourceType> = Vec::new();

        for scope in self.modules {
            for item in &scope.structs {
                if let Some(source_type) = self.source_type(scope, item)? {
                    types.push(source_type);
                }
            }
        }

        for scope in self.modules {
            for item in &scope.impls {
                self.apply_impl(scope, item, &mut types);
            }
        }

        Ok(SourceCrate {
            name: self.crate_name.to_string(),
            types,
        })
    }

    /// 带 `#[injectable]` 的结构体，其他结构体不会出现在运行时类型目录中
    fn source_type(&self, scope: &ModuleScope, item: &ItemStruct) -> ScanResult<Option<SourceType>> {
        let module = scope.path.as_slice();
        let Some(args) =
            InjectableArgs::from_attributes(&item.attrs).map_err(|e| ScanError::parse(&scope.file, e))?
        else {
            debug!("未标注 #[injectable]，跳过: {}", item.ident);
            return Ok(None);
        };
        let is_injectable = derives_injectable(&item.attrs).map_err(|e| ScanError::parse(&scope.file, e))?;

        let mut segments = module.to_vec();
        segments.push(item.ident.to_string());
        let joined = segments.join("::");

        let mut source_type = SourceType {
            type_ref: TypeRef {
                path: format!("{}::{joined}", self.crate_name),
                code_path: format!("crate::{joined}"),
                arguments: Vec::new(),
                object: false,
            },
            file: scope.file.clone(),
            is_public: matches!(item.vis, Visibility::Public(_)) && !args.private,
            is_generic: !item.generics.params.is_empty(),
            is_injectable,
            services: Vec::new(),
            attributes: args
                .attributes
                .iter()
                .filter_map(attribute_path)
                .map(|path| self.type_ref(module, &path, false).path)
                .collect(),
            descriptors: args
                .descriptors
                .iter()
                .map(|descriptor| {
                    Ok(SourceDescriptor {
                        service: descriptor
                            .service
                            .as_ref()
                            .map(|service| self.service_ref(scope, service))
                            .transpose()?,
                        lifetime: descriptor.lifetime,
                    })
                })
                .collect::<ScanResult<Vec<_>>>()?,
        };
        for service in &args.implements {
            source_type.add_service(self.service_ref(scope, service)?);
        }
        Ok(Some(source_type))
    }

    /// 手写的 `impl Injectable for Type`
    fn apply_impl(&self, scope: &ModuleScope, item: &ItemImpl, types: &mut [SourceType]) {
        let Some((None, trait_path, _)) = &item.trait_ else {
            return;
        };
        if trait_path.segments.last().map_or(true, |segment| segment.ident != "Injectable") {
            return;
        }
        let Type::Path(self_type) = item.self_ty.as_ref() else {
            return;
        };

        let implementation = self.type_ref(&scope.path, &self_type.path, false).path;
        if let Some(target) = types.iter_mut().find(|ty| ty.type_ref.path == implementation) {
            target.is_injectable = true;
        }
    }
}

/// 是否派生了 `Injectable`
fn derives_injectable(attributes: &[Attribute]) -> syn::Result<bool> {
    for attribute in attributes.iter().filter(|attribute| attribute.path().is_ident("derive")) {
        let derives = attribute.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)?;
        if derives
            .iter()
            .any(|path| path.segments.last().is_some_and(|segment| segment.ident == "Injectable"))
        {
            return Ok(true);
        }
    }
    Ok(false)
}
