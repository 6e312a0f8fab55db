use std::{
    collections::HashSet,
    env, fs,
    path::{Path, PathBuf},
};

use syn::{Expr, ExprLit, ExprMethodCall, File, FnArg, ItemFn, Lit, Type, visit::Visit};

const API_PREFIX: &str = "/api";
const SESSION_GUARD: &str = "AuthSession";

#[derive(Debug, Clone)]
struct RouteEntry {
    method: String,
    path: String,
    source: String,
    handler: String,
}

#[derive(Default)]
struct RouteVisitor {
    source: String,
    routes: Vec<RouteEntry>,
    guarded_handlers: HashSet<String>,
}

impl<'ast> Visit<'ast> for RouteVisitor {
    fn visit_expr_method_call(&mut self, node: &'ast ExprMethodCall) {
        if node.method == "route" {
            let path = node.args.first().and_then(extract_string_literal);
            let handlers = node.args.iter().nth(1).map(extract_handlers).unwrap_or_default();
            match path {
                Some(path) => {
                    for (method, handler) in handlers {
                        self.routes.push(RouteEntry {
                            method,
                            path: format!("{API_PREFIX}{path}"),
                            source: self.source.clone(),
                            handler,
                        });
                    }
                }
                None => println!(
                    "cargo:warning=Skipping non-literal route path in {}",
                    self.source
                ),
            }
        }

        syn::visit::visit_expr_method_call(self, node);
    }

    fn visit_item_fn(&mut self, node: &'ast ItemFn) {
        let guarded = node.sig.inputs.iter().any(|input| match input {
            FnArg::Typed(typed) => is_session_guard(&typed.ty),
            FnArg::Receiver(_) => false,
        });
        if guarded {
            self.guarded_handlers.insert(node.sig.ident.to_string());
        }

        syn::visit::visit_item_fn(self, node);
    }
}

fn is_session_guard(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == SESSION_GUARD),
        Type::Reference(reference) => is_session_guard(&reference.elem),
        Type::Paren(paren) => is_session_guard(&paren.elem),
        _ => false,
    }
}

fn extract_string_literal(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(value),
            ..
        }) => Some(value.value()),
        Expr::Paren(expr) => extract_string_literal(&expr.expr),
        Expr::Reference(expr) => extract_string_literal(&expr.expr),
        _ => None,
    }
}

fn extract_ident(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Path(path) => path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string()),
        _ => None,
    }
}

/// `get(a).post(b)` becomes `[("GET", "a"), ("POST", "b")]`.
fn extract_handlers(expr: &Expr) -> Vec<(String, String)> {
    let mut found = Vec::new();
    collect_handlers(expr, &mut found);
    found.reverse();

    let mut handlers: Vec<(String, String)> = Vec::new();
    for (name, handler) in found {
        if let Some(method) = normalize_method(&name)
            && !handlers.iter().any(|(existing, _)| existing == method)
        {
            handlers.push((method.to_string(), handler.unwrap_or_default()));
        }
    }
    handlers
}

fn collect_handlers(expr: &Expr, out: &mut Vec<(String, Option<String>)>) {
    match expr {
        Expr::Call(call) => {
            if let Expr::Path(path) = &*call.func
                && let Some(segment) = path.path.segments.last()
            {
                out.push((
                    segment.ident.to_string(),
                    call.args.first().and_then(extract_ident),
                ));
            }
        }
        Expr::MethodCall(method_call) => {
            out.push((
                method_call.method.to_string(),
                method_call.args.first().and_then(extract_ident),
            ));
            collect_handlers(&method_call.receiver, out);
        }
        Expr::Paren(expr) => collect_handlers(&expr.expr, out),
        Expr::Reference(expr) => collect_handlers(&expr.expr, out),
        _ => {}
    }
}

fn normalize_method(name: &str) -> Option<&'static str> {
    match name.to_ascii_lowercase().as_str() {
        "get" => Some("GET"),
        "post" => Some("POST"),
        "put" => Some("PUT"),
        "delete" => Some("DELETE"),
        "patch" => Some("PATCH"),
        _ => None,
    }
}

fn escape_rust_string(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn parse_file(path: &Path, manifest_dir: &Path) -> (Vec<RouteEntry>, HashSet<String>) {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read {}: {}", path.display(), err));
    let parsed: File = syn::parse_file(&content)
        .unwrap_or_else(|err| panic!("failed to parse {}: {}", path.display(), err));
    let source = path
        .strip_prefix(manifest_dir)
        .unwrap_or(path)
        .display()
        .to_string();
    let mut visitor = RouteVisitor {
        source,
        ..RouteVisitor::default()
    };
    visitor.visit_file(&parsed);
    (visitor.routes, visitor.guarded_handlers)
}

fn collect_route_files(routes_dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let entries = fs::read_dir(routes_dir)
        .unwrap_or_else(|err| panic!("failed to read {}: {}", routes_dir.display(), err));
    for entry in entries {
        let entry = entry.unwrap_or_else(|err| panic!("failed to read dir entry: {}", err));
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
            files.push(path);
        }
    }
    files.sort();
    files
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("missing CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(&manifest_dir);
    let routes_dir = manifest_path.join("src/routes/api");

    let files = collect_route_files(&routes_dir);
    for file in &files {
        println!("cargo:rerun-if-changed={}", file.display());
    }

    let mut output = String::from("pub static ROUTES: &[RouteInfo] = &[\n");
    let mut routes = Vec::new();
    for file in files {
        let (file_routes, guarded) = parse_file(&file, manifest_path);
        routes.extend(
            file_routes
                .into_iter()
                .map(|route| {
                    let auth_required = guarded.contains(&route.handler);
                    (route, auth_required)
                }),
        );
    }

    routes.sort_by(|(a, _), (b, _)| a.path.cmp(&b.path).then(a.method.cmp(&b.method)));

    for (route, auth_required) in routes {
        output.push_str(&format!(
            "    RouteInfo {{ method: \"{}\", path: \"{}\", source: \"{}\", handler: \"{}\", auth_required: {} }},\n",
            escape_rust_string(&route.method),
            escape_rust_string(&route.path),
            escape_rust_string(&route.source),
            escape_rust_string(&route.handler),
            auth_required
        ));
    }
    output.push_str("];\n");

    let out_dir = env::var("OUT_DIR").expect("missing OUT_DIR");
    let out_path = Path::new(&out_dir).join("routes_generated.rs");
    fs::write(&out_path, output)
        .unwrap_or_else(|err| panic!("failed to write {}: {}", out_path.display(), err));
}
