//! Canonical source printer.
//!
//! Renders an [`Ast`] file back to compilable Go text. The output is
//! position-independent and fully deterministic: one statement per line,
//! tab indentation, a single blank line between top-level declarations,
//! minimal parenthesization re-derived from operator precedence. Identical
//! trees print to identical bytes, which is what makes the printed form
//! usable as a candidate fingerprint.
//!
//! Comments never reach the tree, so none are printed.

use crate::ast::{Ast, BinOp, ChanDir, Node, NodeId};

/// Print the file rooted at `file` to a string.
pub fn print_file(ast: &Ast, file: NodeId) -> String {
    let mut p = Printer {
        ast,
        out: String::new(),
        indent: 0,
    };
    p.file(file);
    p.out
}

struct Printer<'a> {
    ast: &'a Ast,
    out: String,
    indent: usize,
}

// Binding strength used to decide parenthesization. Mirrors Go's operator
// precedence; primaries sit above every operator.
const PREC_LOWEST: u8 = 0;
const PREC_UNARY: u8 = 6;
const PREC_PRIMARY: u8 = 7;

fn bin_prec(op: BinOp) -> u8 {
    match op {
        BinOp::LogicalOr => 1,
        BinOp::LogicalAnd => 2,
        BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => 3,
        BinOp::Add | BinOp::Sub | BinOp::Or | BinOp::Xor => 4,
        BinOp::Mul
        | BinOp::Div
        | BinOp::Rem
        | BinOp::And
        | BinOp::AndNot
        | BinOp::Shl
        | BinOp::Shr => 5,
    }
}

impl<'a> Printer<'a> {
    fn push(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push('\t');
        }
    }

    fn file(&mut self, file: NodeId) {
        let (package, imports, decls) = match self.ast.node(file) {
            Node::File {
                package,
                imports,
                decls,
            } => (*package, imports.clone(), decls.clone()),
            other => panic!("print_file on non-file node {:?}", other),
        };
        self.push("package ");
        self.expr(package, PREC_LOWEST);
        self.push("\n");
        for import in imports {
            self.push("\n");
            self.decl(import);
            self.push("\n");
        }
        for decl in decls {
            self.push("\n");
            self.decl(decl);
            self.push("\n");
        }
    }

    fn decl(&mut self, id: NodeId) {
        match self.ast.node(id) {
            Node::GenDecl { keyword, specs } => {
                let keyword = *keyword;
                let specs = specs.clone();
                self.push(&keyword.to_string());
                if specs.len() == 1 {
                    self.push(" ");
                    self.spec(specs[0]);
                } else {
                    self.push(" (");
                    self.indent += 1;
                    for spec in specs {
                        self.newline();
                        self.spec(spec);
                    }
                    self.indent -= 1;
                    self.newline();
                    self.push(")");
                }
            }
            Node::FuncDecl {
                recv,
                name,
                sig,
                body,
            } => {
                let (recv, name, sig, body) = (*recv, *name, *sig, *body);
                self.push("func ");
                if let Some(recv) = recv {
                    self.push("(");
                    self.params_inner(recv);
                    self.push(") ");
                }
                self.expr(name, PREC_LOWEST);
                self.signature(sig);
                if let Some(body) = body {
                    self.push(" ");
                    self.block(body);
                }
            }
            other => panic!("not a declaration: {:?}", other),
        }
    }

    fn spec(&mut self, id: NodeId) {
        match self.ast.node(id) {
            Node::ImportSpec { alias, path } => {
                let (alias, path) = (*alias, *path);
                if let Some(alias) = alias {
                    self.expr(alias, PREC_LOWEST);
                    self.push(" ");
                }
                self.expr(path, PREC_LOWEST);
            }
            Node::ValueSpec { names, ty, values } => {
                let (names, ty, values) = (names.clone(), *ty, values.clone());
                self.expr_list(&names);
                if let Some(ty) = ty {
                    self.push(" ");
                    self.expr(ty, PREC_LOWEST);
                }
                if !values.is_empty() {
                    self.push(" = ");
                    self.expr_list(&values);
                }
            }
            Node::TypeSpec { name, ty } => {
                let (name, ty) = (*name, *ty);
                self.expr(name, PREC_LOWEST);
                self.push(" ");
                self.expr(ty, PREC_LOWEST);
            }
            other => panic!("not a spec: {:?}", other),
        }
    }

    /// Function signature without the leading `func` keyword.
    fn signature(&mut self, sig: NodeId) {
        let (params, results) = match self.ast.node(sig) {
            Node::FuncType { params, results } => (*params, *results),
            other => panic!("not a func type: {:?}", other),
        };
        self.push("(");
        self.params_inner(params);
        self.push(")");
        if let Some(results) = results {
            self.results(results);
        }
    }

    fn params_inner(&mut self, list: NodeId) {
        let fields = match self.ast.node(list) {
            Node::FieldList { fields } => fields.clone(),
            other => panic!("not a field list: {:?}", other),
        };
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.field(*field);
        }
    }

    fn results(&mut self, list: NodeId) {
        let fields = match self.ast.node(list) {
            Node::FieldList { fields } => fields.clone(),
            other => panic!("not a field list: {:?}", other),
        };
        if fields.is_empty() {
            return;
        }
        // A single unnamed result prints bare, anything else parenthesized.
        let bare = fields.len() == 1
            && matches!(self.ast.node(fields[0]), Node::Field { names, .. } if names.is_empty());
        self.push(" ");
        if bare {
            self.field(fields[0]);
        } else {
            self.push("(");
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    self.push(", ");
                }
                self.field(*field);
            }
            self.push(")");
        }
    }

    fn field(&mut self, id: NodeId) {
        let (names, ty) = match self.ast.node(id) {
            Node::Field { names, ty } => (names.clone(), *ty),
            other => panic!("not a field: {:?}", other),
        };
        if !names.is_empty() {
            self.expr_list(&names);
            self.push(" ");
        }
        self.expr(ty, PREC_LOWEST);
    }

    fn block(&mut self, id: NodeId) {
        let stmts = match self.ast.node(id) {
            Node::Block { stmts } => stmts.clone(),
            other => panic!("not a block: {:?}", other),
        };
        if stmts.is_empty() {
            self.push("{");
            self.newline();
            self.push("}");
            return;
        }
        self.push("{");
        self.indent += 1;
        for stmt in stmts {
            self.newline();
            self.stmt(stmt);
        }
        self.indent -= 1;
        self.newline();
        self.push("}");
    }

    fn stmt(&mut self, id: NodeId) {
        match self.ast.node(id) {
            Node::DeclStmt { decl } => {
                let decl = *decl;
                self.decl(decl);
            }
            Node::LabeledStmt { label, stmt } => {
                let (label, stmt) = (*label, *stmt);
                self.expr(label, PREC_LOWEST);
                self.push(":");
                self.newline();
                self.stmt(stmt);
            }
            Node::ReturnStmt { results } => {
                let results = results.clone();
                self.push("return");
                if !results.is_empty() {
                    self.push(" ");
                    self.expr_list(&results);
                }
            }
            Node::BranchStmt { keyword, label } => {
                let (keyword, label) = (*keyword, *label);
                self.push(&keyword.to_string());
                if let Some(label) = label {
                    self.push(" ");
                    self.expr(label, PREC_LOWEST);
                }
            }
            Node::GoStmt { call } => {
                let call = *call;
                self.push("go ");
                self.expr(call, PREC_LOWEST);
            }
            Node::DeferStmt { call } => {
                let call = *call;
                self.push("defer ");
                self.expr(call, PREC_LOWEST);
            }
            Node::Block { .. } => self.block(id),
            Node::IfStmt { .. } => self.if_stmt(id),
            Node::SwitchStmt { init, tag, cases } => {
                let (init, tag, cases) = (*init, *tag, cases.clone());
                self.push("switch");
                if let Some(init) = init {
                    self.push(" ");
                    self.simple_stmt(init);
                    self.push(";");
                }
                if let Some(tag) = tag {
                    self.push(" ");
                    self.expr(tag, PREC_LOWEST);
                }
                self.push(" ");
                self.case_body(&cases);
            }
            Node::TypeSwitchStmt {
                init,
                assign,
                cases,
            } => {
                let (init, assign, cases) = (*init, *assign, cases.clone());
                self.push("switch");
                if let Some(init) = init {
                    self.push(" ");
                    self.simple_stmt(init);
                    self.push(";");
                }
                self.push(" ");
                self.simple_stmt(assign);
                self.push(" ");
                self.case_body(&cases);
            }
            Node::SelectStmt { cases } => {
                let cases = cases.clone();
                self.push("select ");
                self.case_body(&cases);
            }
            Node::ForStmt {
                init,
                cond,
                post,
                body,
            } => {
                let (init, cond, post, body) = (*init, *cond, *post, *body);
                self.push("for");
                if init.is_some() || post.is_some() {
                    self.push(" ");
                    if let Some(init) = init {
                        self.simple_stmt(init);
                    }
                    self.push(";");
                    if let Some(cond) = cond {
                        self.push(" ");
                        self.expr(cond, PREC_LOWEST);
                    }
                    self.push(";");
                    if let Some(post) = post {
                        self.push(" ");
                        self.simple_stmt(post);
                    }
                } else if let Some(cond) = cond {
                    self.push(" ");
                    self.expr(cond, PREC_LOWEST);
                }
                self.push(" ");
                self.block(body);
            }
            Node::RangeStmt {
                key,
                value,
                define,
                expr,
                body,
            } => {
                let (key, value, define, expr, body) = (*key, *value, *define, *expr, *body);
                self.push("for ");
                if let Some(key) = key {
                    self.expr(key, PREC_LOWEST);
                    if let Some(value) = value {
                        self.push(", ");
                        self.expr(value, PREC_LOWEST);
                    }
                    self.push(if define { " := " } else { " = " });
                }
                self.push("range ");
                self.expr(expr, PREC_LOWEST);
                self.push(" ");
                self.block(body);
            }
            _ => self.simple_stmt(id),
        }
    }

    /// Statements legal in if/for/switch headers; printed without newlines.
    fn simple_stmt(&mut self, id: NodeId) {
        match self.ast.node(id) {
            Node::ExprStmt { expr } => {
                let expr = *expr;
                self.expr(expr, PREC_LOWEST);
            }
            Node::SendStmt { chan, value } => {
                let (chan, value) = (*chan, *value);
                self.expr(chan, PREC_LOWEST);
                self.push(" <- ");
                self.expr(value, PREC_LOWEST);
            }
            Node::IncDecStmt { expr, inc } => {
                let (expr, inc) = (*expr, *inc);
                self.expr(expr, PREC_LOWEST);
                self.push(if inc { "++" } else { "--" });
            }
            Node::AssignStmt { op, lhs, rhs } => {
                let (op, lhs, rhs) = (*op, lhs.clone(), rhs.clone());
                self.expr_list(&lhs);
                self.push(" ");
                self.push(&op.to_string());
                self.push(" ");
                self.expr_list(&rhs);
            }
            other => panic!("not a simple statement: {:?}", other),
        }
    }

    fn if_stmt(&mut self, id: NodeId) {
        let (init, cond, body, else_) = match self.ast.node(id) {
            Node::IfStmt {
                init,
                cond,
                body,
                else_,
            } => (*init, *cond, *body, *else_),
            other => panic!("not an if statement: {:?}", other),
        };
        self.push("if ");
        if let Some(init) = init {
            self.simple_stmt(init);
            self.push("; ");
        }
        self.expr(cond, PREC_LOWEST);
        self.push(" ");
        self.block(body);
        if let Some(else_) = else_ {
            self.push(" else ");
            match self.ast.node(else_) {
                Node::IfStmt { .. } => self.if_stmt(else_),
                _ => self.block(else_),
            }
        }
    }

    fn case_body(&mut self, cases: &[NodeId]) {
        if cases.is_empty() {
            self.push("{");
            self.newline();
            self.push("}");
            return;
        }
        self.push("{");
        for case in cases {
            self.newline();
            match self.ast.node(*case) {
                Node::CaseClause { exprs, body } => {
                    let (exprs, body) = (exprs.clone(), body.clone());
                    if exprs.is_empty() {
                        self.push("default:");
                    } else {
                        self.push("case ");
                        self.expr_list(&exprs);
                        self.push(":");
                    }
                    self.indent += 1;
                    for stmt in body {
                        self.newline();
                        self.stmt(stmt);
                    }
                    self.indent -= 1;
                }
                Node::CommClause { comm, body } => {
                    let (comm, body) = (*comm, body.clone());
                    match comm {
                        Some(comm) => {
                            self.push("case ");
                            self.simple_stmt(comm);
                            self.push(":");
                        }
                        None => self.push("default:"),
                    }
                    self.indent += 1;
                    for stmt in body {
                        self.newline();
                        self.stmt(stmt);
                    }
                    self.indent -= 1;
                }
                other => panic!("not a case clause: {:?}", other),
            }
        }
        self.newline();
        self.push("}");
    }

    fn expr_list(&mut self, ids: &[NodeId]) {
        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr(*id, PREC_LOWEST);
        }
    }

    /// Print an expression, parenthesizing when its binding strength is
    /// below what the context requires.
    fn expr(&mut self, id: NodeId, min_prec: u8) {
        match self.ast.node(id) {
            Node::Ident { name } => {
                let name = name.clone();
                self.push(&name);
            }
            Node::BasicLit { text, .. } => {
                let text = text.clone();
                self.push(&text);
            }
            Node::Paren { inner } => {
                let inner = *inner;
                self.push("(");
                self.expr(inner, PREC_LOWEST);
                self.push(")");
            }
            Node::Binary { op, left, right } => {
                let (op, left, right) = (*op, *left, *right);
                let prec = bin_prec(op);
                let parens = prec < min_prec;
                if parens {
                    self.push("(");
                }
                self.expr(left, prec);
                self.push(" ");
                self.push(&op.to_string());
                self.push(" ");
                self.expr(right, prec + 1);
                if parens {
                    self.push(")");
                }
            }
            Node::Unary { op, operand } => {
                let (op, operand) = (*op, *operand);
                let parens = PREC_UNARY < min_prec;
                if parens {
                    self.push("(");
                }
                self.push(&op.to_string());
                // A nested prefix expression keeps explicit parens so `- -x`
                // never prints as `--x`.
                if matches!(self.ast.node(operand), Node::Unary { .. }) {
                    self.expr(operand, PREC_PRIMARY);
                } else {
                    self.expr(operand, PREC_UNARY);
                }
                if parens {
                    self.push(")");
                }
            }
            Node::Star { inner } => {
                let inner = *inner;
                let parens = PREC_UNARY < min_prec;
                if parens {
                    self.push("(");
                }
                self.push("*");
                self.expr(inner, PREC_UNARY);
                if parens {
                    self.push(")");
                }
            }
            Node::Selector { base, sel } => {
                let (base, sel) = (*base, *sel);
                self.expr(base, PREC_PRIMARY);
                self.push(".");
                self.expr(sel, PREC_LOWEST);
            }
            Node::Index { base, index } => {
                let (base, index) = (*base, *index);
                self.expr(base, PREC_PRIMARY);
                self.push("[");
                self.expr(index, PREC_LOWEST);
                self.push("]");
            }
            Node::SliceExpr {
                base,
                low,
                high,
                max,
                three_index,
            } => {
                let (base, low, high, max, three_index) =
                    (*base, *low, *high, *max, *three_index);
                self.expr(base, PREC_PRIMARY);
                self.push("[");
                if let Some(low) = low {
                    self.expr(low, PREC_LOWEST);
                }
                self.push(":");
                if let Some(high) = high {
                    self.expr(high, PREC_LOWEST);
                }
                if three_index {
                    self.push(":");
                    if let Some(max) = max {
                        self.expr(max, PREC_LOWEST);
                    }
                }
                self.push("]");
            }
            Node::TypeAssert { base, ty } => {
                let (base, ty) = (*base, *ty);
                self.expr(base, PREC_PRIMARY);
                self.push(".(");
                match ty {
                    Some(ty) => self.expr(ty, PREC_LOWEST),
                    None => self.push("type"),
                }
                self.push(")");
            }
            Node::Call { fun, args, spread } => {
                let (fun, args, spread) = (*fun, args.clone(), *spread);
                self.expr(fun, PREC_PRIMARY);
                self.push("(");
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.expr(*arg, PREC_LOWEST);
                    if spread && i == args.len() - 1 {
                        self.push("...");
                    }
                }
                self.push(")");
            }
            Node::CompositeLit { ty, elems } => {
                let (ty, elems) = (*ty, elems.clone());
                if let Some(ty) = ty {
                    self.expr(ty, PREC_PRIMARY);
                }
                self.push("{");
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    self.expr(*elem, PREC_LOWEST);
                }
                self.push("}");
            }
            Node::KeyValue { key, value } => {
                let (key, value) = (*key, *value);
                self.expr(key, PREC_LOWEST);
                self.push(": ");
                self.expr(value, PREC_LOWEST);
            }
            Node::FuncLit { sig, body } => {
                let (sig, body) = (*sig, *body);
                self.push("func");
                self.signature(sig);
                self.push(" ");
                self.block(body);
            }
            Node::EllipsisType { elem } => {
                let elem = *elem;
                self.push("...");
                self.expr(elem, PREC_LOWEST);
            }
            Node::ArrayType { len, elem } => {
                let (len, elem) = (*len, *elem);
                self.push("[");
                if let Some(len) = len {
                    self.expr(len, PREC_LOWEST);
                }
                self.push("]");
                self.expr(elem, PREC_LOWEST);
            }
            Node::MapType { key, value } => {
                let (key, value) = (*key, *value);
                self.push("map[");
                self.expr(key, PREC_LOWEST);
                self.push("]");
                self.expr(value, PREC_LOWEST);
            }
            Node::ChanType { dir, elem } => {
                let (dir, elem) = (*dir, *elem);
                match dir {
                    ChanDir::Both => self.push("chan "),
                    ChanDir::Send => self.push("chan<- "),
                    ChanDir::Recv => self.push("<-chan "),
                }
                self.expr(elem, PREC_LOWEST);
            }
            Node::FuncType { .. } => {
                self.push("func");
                self.signature(id);
            }
            Node::StructType { fields } => {
                let fields = *fields;
                self.push("struct");
                self.braced_fields(fields);
            }
            Node::InterfaceType { methods } => {
                let methods = *methods;
                self.push("interface");
                self.braced_fields(methods);
            }
            other => panic!("not an expression: {:?}", other),
        }
    }

    /// Struct/interface body: one field per line, or `{}` when empty.
    fn braced_fields(&mut self, list: NodeId) {
        let fields = match self.ast.node(list) {
            Node::FieldList { fields } => fields.clone(),
            other => panic!("not a field list: {:?}", other),
        };
        if fields.is_empty() {
            self.push("{}");
            return;
        }
        self.push(" {");
        self.indent += 1;
        for field in fields {
            self.newline();
            self.interface_or_struct_field(field);
        }
        self.indent -= 1;
        self.newline();
        self.push("}");
    }

    fn interface_or_struct_field(&mut self, id: NodeId) {
        let (names, ty) = match self.ast.node(id) {
            Node::Field { names, ty } => (names.clone(), *ty),
            other => panic!("not a field: {:?}", other),
        };
        if !names.is_empty() {
            self.expr_list(&names);
            // Interface methods carry a FuncType whose signature glues
            // directly onto the name.
            if matches!(self.ast.node(ty), Node::FuncType { .. }) {
                self.signature(ty);
                return;
            }
            self.push(" ");
        }
        self.expr(ty, PREC_LOWEST);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{AssignOp, DeclKeyword, LitKind, UnOp};
    use crate::span::Span;

    fn zero() -> Span {
        Span::zero(0)
    }

    struct B {
        ast: Ast,
    }

    impl B {
        fn new() -> Self {
            Self { ast: Ast::new() }
        }

        fn ident(&mut self, name: &str) -> NodeId {
            self.ast.alloc(Node::Ident { name: name.into() }, zero())
        }

        fn int(&mut self, text: &str) -> NodeId {
            self.ast.alloc(
                Node::BasicLit {
                    kind: LitKind::Int,
                    text: text.into(),
                },
                zero(),
            )
        }
    }

    #[test]
    fn test_binary_reparenthesized() {
        let mut b = B::new();
        let a = b.ident("a");
        let x = b.ident("x");
        let y = b.ident("y");
        let sum = b.ast.alloc(
            Node::Binary {
                op: BinOp::Add,
                left: x,
                right: y,
            },
            zero(),
        );
        let mul = b.ast.alloc(
            Node::Binary {
                op: BinOp::Mul,
                left: sum,
                right: a,
            },
            zero(),
        );
        let mut p = Printer {
            ast: &b.ast,
            out: String::new(),
            indent: 0,
        };
        p.expr(mul, PREC_LOWEST);
        assert_eq!(p.out, "(x + y) * a");
    }

    #[test]
    fn test_nested_unary_keeps_parens() {
        let mut b = B::new();
        let x = b.ident("x");
        let neg = b.ast.alloc(
            Node::Unary {
                op: UnOp::Minus,
                operand: x,
            },
            zero(),
        );
        let neg2 = b.ast.alloc(
            Node::Unary {
                op: UnOp::Minus,
                operand: neg,
            },
            zero(),
        );
        let mut p = Printer {
            ast: &b.ast,
            out: String::new(),
            indent: 0,
        };
        p.expr(neg2, PREC_LOWEST);
        assert_eq!(p.out, "-(-x)");
    }

    #[test]
    fn test_slice_three_index() {
        let mut b = B::new();
        let s = b.ident("s");
        let low = b.int("0");
        let high = b.int("2");
        let max = b.int("3");
        let slice = b.ast.alloc(
            Node::SliceExpr {
                base: s,
                low: Some(low),
                high: Some(high),
                max: Some(max),
                three_index: true,
            },
            zero(),
        );
        let mut p = Printer {
            ast: &b.ast,
            out: String::new(),
            indent: 0,
        };
        p.expr(slice, PREC_LOWEST);
        assert_eq!(p.out, "s[0:2:3]");
    }

    #[test]
    fn test_whole_file() {
        let mut b = B::new();
        let pkg = b.ident("p");
        let a = b.ident("a");
        let int_ty = b.ident("int");
        let slice_ty = b.ast.alloc(
            Node::ArrayType {
                len: None,
                elem: int_ty,
            },
            zero(),
        );
        let spec = b.ast.alloc(
            Node::ValueSpec {
                names: vec![a],
                ty: Some(slice_ty),
                values: vec![],
            },
            zero(),
        );
        let var_decl = b.ast.alloc(
            Node::GenDecl {
                keyword: DeclKeyword::Var,
                specs: vec![spec],
            },
            zero(),
        );
        let decl_stmt = b.ast.alloc(Node::DeclStmt { decl: var_decl }, zero());

        let println_ident = b.ident("println");
        let a2 = b.ident("a");
        let idx = b.int("0");
        let index = b.ast.alloc(
            Node::Index {
                base: a2,
                index: idx,
            },
            zero(),
        );
        let call = b.ast.alloc(
            Node::Call {
                fun: println_ident,
                args: vec![index],
                spread: false,
            },
            zero(),
        );
        let call_stmt = b.ast.alloc(Node::ExprStmt { expr: call }, zero());

        let body = b.ast.alloc(
            Node::Block {
                stmts: vec![decl_stmt, call_stmt],
            },
            zero(),
        );
        let params = b.ast.alloc(Node::FieldList { fields: vec![] }, zero());
        let sig = b.ast.alloc(
            Node::FuncType {
                params,
                results: None,
            },
            zero(),
        );
        let name = b.ident("Crasher");
        let func = b.ast.alloc(
            Node::FuncDecl {
                recv: None,
                name,
                sig,
                body: Some(body),
            },
            zero(),
        );
        let file = b.ast.alloc(
            Node::File {
                package: pkg,
                imports: vec![],
                decls: vec![func],
            },
            zero(),
        );
        let out = print_file(&b.ast, file);
        assert_eq!(
            out,
            "package p\n\nfunc Crasher() {\n\tvar a []int\n\tprintln(a[0])\n}\n"
        );
    }

    #[test]
    fn test_assignment_ops() {
        let mut b = B::new();
        let x = b.ident("x");
        let one = b.int("1");
        let assign = b.ast.alloc(
            Node::AssignStmt {
                op: AssignOp::Define,
                lhs: vec![x],
                rhs: vec![one],
            },
            zero(),
        );
        let mut p = Printer {
            ast: &b.ast,
            out: String::new(),
            indent: 0,
        };
        p.stmt(assign);
        assert_eq!(p.out, "x := 1");
    }

    #[test]
    fn test_print_is_deterministic() {
        let mut b = B::new();
        let pkg = b.ident("p");
        let file = b.ast.alloc(
            Node::File {
                package: pkg,
                imports: vec![],
                decls: vec![],
            },
            zero(),
        );
        assert_eq!(print_file(&b.ast, file), print_file(&b.ast, file));
    }
}
