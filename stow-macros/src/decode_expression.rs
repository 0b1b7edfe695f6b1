use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{BinOp, Expr, ExprLit, ExprPath, ExprUnary, Lit, LitStr, Stmt, UnOp, spanned::Spanned};

/// Turns a Rust expression into tokens building a `::stow::Expression`.
///
/// Plain paths are fields (`name`, `Self::name` or `User::name` all refer to
/// the field `name`), literals and `{ .. }` blocks are values, the block
/// being evaluated at runtime. Everything else is kept as unsupported and
/// reported when the expression is translated.
pub fn decode_expression(condition: &Expr) -> TokenStream {
    match condition {
        Expr::Binary(v) => {
            let op = match v.op {
                BinOp::Add(..) => quote! { ::stow::BinaryOpType::Addition },
                BinOp::Sub(..) => quote! { ::stow::BinaryOpType::Subtraction },
                BinOp::Mul(..) => quote! { ::stow::BinaryOpType::Multiplication },
                BinOp::Div(..) => quote! { ::stow::BinaryOpType::Division },
                BinOp::Rem(..) => quote! { ::stow::BinaryOpType::Remainder },
                BinOp::And(..) => quote! { ::stow::BinaryOpType::And },
                BinOp::Or(..) => quote! { ::stow::BinaryOpType::Or },
                BinOp::Eq(..) => quote! { ::stow::BinaryOpType::Equal },
                BinOp::Ne(..) => quote! { ::stow::BinaryOpType::NotEqual },
                BinOp::Lt(..) => quote! { ::stow::BinaryOpType::Less },
                BinOp::Le(..) => quote! { ::stow::BinaryOpType::LessEqual },
                BinOp::Ge(..) => quote! { ::stow::BinaryOpType::GreaterEqual },
                BinOp::Gt(..) => quote! { ::stow::BinaryOpType::Greater },
                _ => return unsupported(condition),
            };
            let lhs = decode_expression(&v.left);
            let rhs = decode_expression(&v.right);
            quote! {
                ::stow::Expression::binary(#op, #lhs, #rhs)
            }
        }
        Expr::Unary(ExprUnary {
            op: UnOp::Neg(..),
            expr,
            ..
        }) if matches!(expr.as_ref(), Expr::Lit(..)) => {
            quote! { ::stow::Expression::Value(::stow::Value::from(#condition)) }
        }
        Expr::Unary(v) => {
            let op = match v.op {
                UnOp::Not(..) => quote! { ::stow::UnaryOpType::Not },
                UnOp::Neg(..) => quote! { ::stow::UnaryOpType::Negative },
                _ => return unsupported(condition),
            };
            let arg = decode_expression(&v.expr);
            quote! {
                ::stow::Expression::unary(#op, #arg)
            }
        }
        Expr::Lit(ExprLit { lit, .. }) => match lit {
            Lit::Str(..) | Lit::Int(..) | Lit::Float(..) | Lit::Bool(..) => {
                quote! { ::stow::Expression::Value(::stow::Value::from(#lit)) }
            }
            Lit::Char(v) => quote! {
                ::stow::Expression::Value(::stow::Value::Varchar(Some(
                    ::std::string::String::from(#v)
                )))
            },
            _ => unsupported(condition),
        },
        Expr::Block(v) => {
            // `{ value }` is passed on unwrapped, the braces would trip `unused_braces` at the call site
            let value = match v.block.stmts.as_slice() {
                [Stmt::Expr(expr, None)] if v.label.is_none() && v.attrs.is_empty() => {
                    expr.to_token_stream()
                }
                _ => v.to_token_stream(),
            };
            quote! {
                ::stow::Expression::Value(::stow::Value::from(#value))
            }
        }
        Expr::Paren(v) => decode_expression(&v.expr),
        Expr::Group(v) => decode_expression(&v.expr),
        Expr::Path(ExprPath { path, .. }) => {
            if path.segments.iter().map(|v| &v.ident).eq(["None"].iter()) {
                return quote! { ::stow::Expression::Value(::stow::Value::Null) };
            }
            match path.segments.last() {
                Some(segment) => {
                    let name = LitStr::new(&segment.ident.to_string(), segment.ident.span());
                    quote! { ::stow::Expression::Field(#name) }
                }
                None => unsupported(condition),
            }
        }
        Expr::Call(..) | Expr::MethodCall(..) => {
            let source = source(condition);
            quote! { ::stow::Expression::Call(::std::string::String::from(#source)) }
        }
        _ => unsupported(condition),
    }
}

fn source(expr: &Expr) -> LitStr {
    LitStr::new(&expr.to_token_stream().to_string(), expr.span())
}

fn unsupported(expr: &Expr) -> TokenStream {
    let source = source(expr);
    quote! { ::stow::Expression::Unsupported(::std::string::String::from(#source)) }
}
