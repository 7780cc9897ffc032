extern crate proc_macro;
use core::cmp::Ordering;
use core::ops::{Add, Mul};
use proc_macro2::Span;
use proc_macro2::TokenStream;
use quote::{quote, ToTokens, TokenStreamExt};
use std::collections::{BTreeMap, HashMap};
use syn::parse::{Parse, ParseStream, Result};
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Error, Expr, Fields, Ident, Item, ItemStruct, Lit, LitInt, Token, UnOp};

struct Input {
    items: Vec<Item>,
}

impl Parse for Input {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut items = Vec::new();
        while !input.is_empty() {
            items.push(input.parse()?);
        }
        Ok(Input { items })
    }
}

fn bubble_sort_count_swaps(l: &mut [usize]) -> usize {
    let mut swaps: usize = 0;
    for i in (0..l.len()).rev() {
        for j in 0..i {
            if l[j] > l[j + 1] {
                (l[j], l[j + 1]) = (l[j + 1], l[j]);
                swaps += 1
            }
        }
    }
    swaps
}

fn parity_sign(swaps: usize) -> isize {
    match swaps % 2 {
        0 => 1,
        _ => -1,
    }
}

#[derive(Default, Clone)]
struct SymbolicSumExpr(Vec<SymbolicProdExpr>);

#[derive(PartialEq, Eq, Clone)]
struct SymbolicProdExpr(isize, Vec<Symbol>);

#[derive(PartialOrd, Ord, PartialEq, Eq, Clone)]
struct Symbol(Ident);

impl ToTokens for Symbol {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        self.0.to_tokens(tokens)
    }
}

impl PartialOrd for SymbolicProdExpr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SymbolicProdExpr {
    fn cmp(&self, other: &Self) -> Ordering {
        self.1.cmp(&other.1).then_with(|| self.0.cmp(&other.0))
    }
}

impl Mul<SymbolicProdExpr> for SymbolicProdExpr {
    type Output = SymbolicProdExpr;
    fn mul(mut self, mut r: SymbolicProdExpr) -> SymbolicProdExpr {
        self.0 *= r.0;
        self.1.append(&mut r.1);
        self
    }
}

impl SymbolicProdExpr {
    fn simplify(mut self) -> Self {
        if self.0 == 0 {
            self.1.clear();
        } else {
            self.1.sort();
        }
        self
    }
}

impl ToTokens for SymbolicSumExpr {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        if self.0.is_empty() {
            tokens.append_all(quote! { T::zero() });
            return;
        }
        for (count, SymbolicProdExpr(coef, prod_terms)) in self.0.iter().enumerate() {
            if *coef >= 0 {
                if count != 0 {
                    tokens.append_all(quote! { + });
                }
            } else {
                tokens.append_all(quote! { - });
            }

            // Integer weights from the metric become T::from_integer(n)
            let magnitude = coef.unsigned_abs();
            let mut factors: Vec<TokenStream> = Vec::new();
            if prod_terms.is_empty() {
                if magnitude == 1 {
                    factors.push(quote! { T::one() });
                } else {
                    let lit = LitInt::new(&format!("{}", magnitude), Span::call_site());
                    factors.push(quote! { T::from_integer(#lit) });
                }
            } else if magnitude != 1 {
                let lit = LitInt::new(&format!("{}", magnitude), Span::call_site());
                factors.push(quote! { T::from_integer(#lit) });
            }
            factors.extend(prod_terms.iter().map(|sym| quote! { #sym }));

            for (factor_count, factor) in factors.iter().enumerate() {
                if factor_count > 0 {
                    tokens.append_all(quote! { * });
                }
                factor.to_tokens(tokens);
            }
        }
    }
}

impl SymbolicSumExpr {
    fn simplify(mut self) -> Self {
        self.0 = self.0.into_iter().map(|prod| prod.simplify()).collect();

        // Sort so that terms with equal symbols are adjacent, then combine them
        self.0.sort();

        let mut new_expression = vec![];
        let mut prev_coef = 0;
        let mut prev_symbols = vec![];
        for SymbolicProdExpr(coef, symbols) in self.0.into_iter() {
            if prev_symbols == symbols {
                prev_coef += coef;
            } else {
                new_expression.push(SymbolicProdExpr(prev_coef, prev_symbols));
                prev_coef = coef;
                prev_symbols = symbols;
            }
        }
        new_expression.push(SymbolicProdExpr(prev_coef, prev_symbols));

        self.0 = new_expression;
        self.0.retain(|prod| prod.0 != 0);

        self
    }

    fn scaled(self, factor: isize) -> Self {
        SymbolicSumExpr(
            self.0
                .into_iter()
                .map(|SymbolicProdExpr(coef, symbols)| SymbolicProdExpr(coef * factor, symbols))
                .collect(),
        )
    }

    fn is_zero(&self) -> bool {
        self.0.is_empty()
    }
}

impl Add<SymbolicSumExpr> for SymbolicSumExpr {
    type Output = SymbolicSumExpr;
    fn add(mut self, mut r: SymbolicSumExpr) -> SymbolicSumExpr {
        self.0.append(&mut r.0);
        self
    }
}

impl Mul<SymbolicSumExpr> for SymbolicSumExpr {
    type Output = SymbolicSumExpr;
    fn mul(self, r: SymbolicSumExpr) -> SymbolicSumExpr {
        let SymbolicSumExpr(l) = self;
        SymbolicSumExpr(
            l.iter()
                .flat_map(|lp| r.0.iter().map(|rp| lp.clone() * rp.clone()))
                .collect(),
        )
    }
}

// A basis blade is the sorted list of basis vector indices it is built from.
// e.g. vec![] = 1, vec![1, 2] = e_12
type Blade = Vec<usize>;
type BladeSum = BTreeMap<Blade, isize>;

fn add_term(sum: &mut BladeSum, blade: Blade, coef: isize) {
    if coef == 0 {
        return;
    }
    let entry = sum.entry(blade.clone()).or_insert(0);
    *entry += coef;
    if *entry == 0 {
        sum.remove(&blade);
    }
}

/// v ∧ B for a basis vector v and a sorted blade B
fn wedge_vector(v: usize, b: &[usize]) -> Option<(Blade, isize)> {
    match b.binary_search(&v) {
        Ok(_) => None,
        Err(pos) => {
            let mut result = b.to_vec();
            result.insert(pos, v);
            Some((result, parity_sign(pos)))
        }
    }
}

/// v ⌋ B under a general (possibly non-diagonal) metric
fn contract_vector(metric: &[Vec<isize>], v: usize, b: &[usize]) -> Vec<(Blade, isize)> {
    b.iter()
        .enumerate()
        .filter_map(|(j, &bj)| {
            let g = metric[v][bj];
            (g != 0).then(|| {
                let mut rest = b.to_vec();
                rest.remove(j);
                (rest, parity_sign(j) * g)
            })
        })
        .collect()
}

fn mul_vector(metric: &[Vec<isize>], v: usize, x: &BladeSum) -> BladeSum {
    let mut out = BladeSum::new();
    for (b, &c) in x.iter() {
        if let Some((blade, sign)) = wedge_vector(v, b) {
            add_term(&mut out, blade, c * sign);
        }
        for (blade, sign) in contract_vector(metric, v, b) {
            add_term(&mut out, blade, c * sign);
        }
    }
    out
}

/// Geometric product of two basis blades.
///
/// With A = a₁ ∧ A', the product is expanded as
/// A B = a₁ (A' B) - (a₁ ⌋ A') B
/// which holds for any symmetric bilinear form.
fn mul_blades(
    metric: &[Vec<isize>],
    a: &[usize],
    b: &[usize],
    cache: &mut HashMap<(Blade, Blade), BladeSum>,
) -> BladeSum {
    let key = (a.to_vec(), b.to_vec());
    if let Some(result) = cache.get(&key) {
        return result.clone();
    }
    let result = if a.is_empty() {
        let mut out = BladeSum::new();
        out.insert(b.to_vec(), 1);
        out
    } else {
        let (a1, a_rest) = (a[0], &a[1..]);
        let partial = mul_blades(metric, a_rest, b, cache);
        let mut out = mul_vector(metric, a1, &partial);
        for (k, c) in contract_vector(metric, a1, a_rest) {
            for (blade, c2) in mul_blades(metric, &k, b, cache) {
                add_term(&mut out, blade, -c * c2);
            }
        }
        out
    };
    cache.insert(key, result.clone());
    result
}

struct Algebra {
    prefix: String,
    basis_chars: Vec<char>,
    metric: Vec<Vec<isize>>,
    blades: Vec<Blade>,
    blade_names: Vec<Ident>,
}

impl Algebra {
    fn dimension(&self) -> usize {
        self.basis_chars.len()
    }

    /// Parse a field or blade name into (sorted blade, sign of the spelled order).
    /// Names not composed of basis vectors are the scalar.
    fn parse_blade_name(&self, name: &str) -> (Blade, isize) {
        let Some(rest) = name.strip_prefix(self.prefix.as_str()) else {
            return (vec![], 1);
        };
        if rest.is_empty() {
            return (vec![], 1);
        }
        let mut indices = vec![];
        for c in rest.chars() {
            match self.basis_chars.iter().position(|&b| b == c) {
                Some(ix) if !indices.contains(&ix) => indices.push(ix),
                _ => return (vec![], 1),
            }
        }
        let swaps = bubble_sort_count_swaps(&mut indices);
        (indices, parity_sign(swaps))
    }

    fn blade_index(&self, blade: &[usize]) -> Option<usize> {
        self.blades.iter().position(|b| b == blade)
    }

    fn grade(&self, ix: usize) -> usize {
        self.blades[ix].len()
    }

    fn reverse_sign(&self, ix: usize) -> isize {
        let k = self.grade(ix);
        parity_sign(k * k.saturating_sub(1) / 2)
    }

    fn pseudoscalar_index(&self) -> Option<usize> {
        let full: Blade = (0..self.dimension()).collect();
        self.blade_index(&full)
    }
}

fn parse_integer(expr: &Expr) -> Result<isize> {
    match expr {
        Expr::Lit(lit) => match &lit.lit {
            Lit::Int(i) => i.base10_parse::<isize>(),
            _ => Err(Error::new_spanned(expr, "expected an integer")),
        },
        Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => Ok(-parse_integer(&unary.expr)?),
        Expr::Group(group) => parse_integer(&group.expr),
        Expr::Paren(paren) => parse_integer(&paren.expr),
        _ => Err(Error::new_spanned(expr, "expected an integer")),
    }
}

fn parse_metric(mac: &syn::Macro, dimension: usize) -> Result<Vec<Vec<isize>>> {
    let entries = mac.parse_body_with(Punctuated::<Expr, Token![,]>::parse_terminated)?;
    let metric: Vec<Vec<isize>> = if entries.iter().all(|e| matches!(e, Expr::Array(_))) {
        // Full matrix, one row per basis vector
        entries
            .iter()
            .map(|row| match row {
                Expr::Array(array) => array.elems.iter().map(parse_integer).collect(),
                _ => unreachable!(),
            })
            .collect::<Result<_>>()?
    } else {
        // Diagonal metric
        let diagonal = entries.iter().map(parse_integer).collect::<Result<Vec<_>>>()?;
        (0..diagonal.len())
            .map(|i| {
                (0..diagonal.len())
                    .map(|j| if i == j { diagonal[i] } else { 0 })
                    .collect()
            })
            .collect()
    };

    if metric.len() != dimension || metric.iter().any(|row| row.len() != dimension) {
        return Err(Error::new_spanned(
            &mac.tokens,
            format!("metric must be {} x {} to match the basis", dimension, dimension),
        ));
    }
    for i in 0..dimension {
        for j in 0..dimension {
            if metric[i][j] != metric[j][i] {
                return Err(Error::new_spanned(&mac.tokens, "metric must be symmetric"));
            }
        }
    }
    Ok(metric)
}

/// Split basis names like [e0, e1, ei] into a common prefix ("e") and one character each
fn parse_basis(mac: &syn::Macro) -> Result<(String, Vec<char>)> {
    let names: Vec<String> = mac
        .parse_body_with(Punctuated::<Ident, Token![,]>::parse_terminated)?
        .iter()
        .map(|i| i.to_string())
        .collect();
    let Some(first) = names.first() else {
        return Err(Error::new_spanned(&mac.tokens, "basis must not be empty"));
    };
    let prefix_len = first.chars().count() - 1;
    let prefix: String = first.chars().take(prefix_len).collect();
    let mut chars = vec![];
    for name in names.iter() {
        let suffix: Vec<char> = match name.strip_prefix(prefix.as_str()) {
            Some(s) => s.chars().collect(),
            None => vec![],
        };
        if suffix.len() != 1 || chars.contains(&suffix[0]) {
            return Err(Error::new_spanned(
                &mac.tokens,
                "basis vectors must share a prefix and differ by one character",
            ));
        }
        chars.push(suffix[0]);
    }
    Ok((prefix, chars))
}

struct Field {
    ident: Ident,
    blade: usize,
    sign: isize,
}

// We will represent each object as the list of its fields,
// each mapped to one blade of the global enumeration.
// The scalar type T is the object with a single scalar pseudo-field.
struct Object {
    name: Ident,
    fields: Vec<Field>,
    is_scalar: bool,
    is_versor: bool,
}

impl Object {
    fn type_name(&self) -> TokenStream {
        if self.is_scalar {
            quote! { T }
        } else {
            let name = &self.name;
            quote! { #name < T > }
        }
    }

    fn type_name_colons(&self) -> TokenStream {
        if self.is_scalar {
            quote! { T }
        } else {
            let name = &self.name;
            quote! { #name :: < T > }
        }
    }

    fn has_blade(&self, ix: usize) -> bool {
        self.fields.iter().any(|f| f.blade == ix)
    }

    fn is_full(&self, blade_count: usize) -> bool {
        self.fields.len() == blade_count
    }

    fn is_same(&self, other: &Object) -> bool {
        self.is_scalar == other.is_scalar && self.name == other.name
    }

    fn is_subset_of(&self, other: &Object) -> bool {
        self.fields.iter().all(|f| other.has_blade(f.blade))
    }
}

fn coefficient_symbol(var: &str, field: &Ident) -> Symbol {
    Symbol(Ident::new(&format!("{}_{}", var, field), Span::call_site()))
}

type SymbolicMultivector = Vec<SymbolicSumExpr>;

fn symbolic_object(algebra: &Algebra, obj: &Object, var: &str) -> SymbolicMultivector {
    let mut result: SymbolicMultivector = vec![Default::default(); algebra.blades.len()];
    for field in obj.fields.iter() {
        result[field.blade] = SymbolicSumExpr(vec![SymbolicProdExpr(
            field.sign,
            vec![coefficient_symbol(var, &field.ident)],
        )]);
    }
    result
}

fn symbolic_reverse(algebra: &Algebra, x: SymbolicMultivector) -> SymbolicMultivector {
    x.into_iter()
        .enumerate()
        .map(|(ix, expr)| expr.scaled(algebra.reverse_sign(ix)))
        .collect()
}

fn symbolic_sum(a: SymbolicMultivector, b: SymbolicMultivector, sign: isize) -> SymbolicMultivector {
    a.into_iter()
        .zip(b)
        .map(|(l, r)| (l + r.scaled(sign)).simplify())
        .collect()
}

/// Multiply two symbolic multivectors using the multiplication table,
/// keeping only the blade pairings accepted by `filter(grade_a, grade_b, grade_out)`
fn symbolic_product<F: Fn(usize, usize, usize) -> bool>(
    algebra: &Algebra,
    table: &[Vec<Vec<(isize, usize)>>],
    a: &SymbolicMultivector,
    b: &SymbolicMultivector,
    filter: F,
) -> SymbolicMultivector {
    let mut result: SymbolicMultivector = vec![Default::default(); a.len()];
    for (i, a_expr) in a.iter().enumerate().filter(|(_, e)| !e.is_zero()) {
        for (j, b_expr) in b.iter().enumerate().filter(|(_, e)| !e.is_zero()) {
            let terms: Vec<_> = table[i][j]
                .iter()
                .filter(|&&(_, k)| filter(algebra.grade(i), algebra.grade(j), algebra.grade(k)))
                .collect();
            if terms.is_empty() {
                continue;
            }
            let product = a_expr.clone() * b_expr.clone();
            for &&(coef, k) in terms.iter() {
                result[k] = core::mem::take(&mut result[k]) + product.clone().scaled(coef);
            }
        }
    }
    result.into_iter().map(|expr| expr.simplify()).collect()
}

/// Find the first declared object that can represent every non-zero blade of the result
fn select_output<'a>(objects: &'a [Object], expressions: &[SymbolicSumExpr]) -> Option<&'a Object> {
    let nonzero: Vec<usize> = expressions
        .iter()
        .enumerate()
        .filter_map(|(ix, e)| (!e.is_zero()).then_some(ix))
        .collect();
    if nonzero.is_empty() {
        // This operation unconditionally returns 0,
        // so invoking it is probably a type error--
        // do not generate code for it
        return None;
    }
    objects
        .iter()
        .find(|o| nonzero.iter().all(|&ix| o.has_blade(ix)))
}

fn destructure(oldvar: TokenStream, newvar: &str, obj: &Object) -> TokenStream {
    if obj.is_scalar {
        let newvar_ident = coefficient_symbol(newvar, &obj.fields[0].ident);
        quote! { let #newvar_ident = #oldvar; }
    } else {
        let obj_type_name = obj.type_name_colons();
        let obj_field_list: TokenStream = obj
            .fields
            .iter()
            .map(|f| {
                let field = &f.ident;
                let specific_newvar = coefficient_symbol(newvar, &f.ident);
                quote! { #field: #specific_newvar, }
            })
            .collect();
        quote! { let #obj_type_name { #obj_field_list } = #oldvar; }
    }
}

fn construct(obj: &Object, expressions: &[SymbolicSumExpr]) -> TokenStream {
    if obj.is_scalar {
        let expr = &expressions[obj.fields[0].blade];
        return quote! { #expr };
    }
    let output_type_name = obj.type_name_colons();
    let output_fields: TokenStream = obj
        .fields
        .iter()
        .map(|f| {
            let field = &f.ident;
            let expr = expressions[f.blade].clone().scaled(f.sign);
            quote! { #field: #expr, }
        })
        .collect();
    quote! {
        #output_type_name {
            #output_fields
        }
    }
}

fn gen_binary_operator<F: Fn(&Object, &Object) -> SymbolicMultivector>(
    objects: &[Object],
    op_trait: TokenStream,
    op_fn: Ident,
    lhs_obj: &Object,
    op: F,
) -> TokenStream {
    objects
        .iter()
        .map(|rhs_obj| {
            if lhs_obj.is_scalar {
                // Do not generate operations with the scalar being the LHS--
                // these violate rust's orphan rule
                return quote! {};
            }

            let expressions = op(lhs_obj, rhs_obj);
            let Some(output_object) = select_output(objects, &expressions) else {
                return quote! {};
            };

            let output_type_name = output_object.type_name();
            let rhs_type_name = rhs_obj.type_name();
            let lhs_type_name = lhs_obj.type_name();
            let destructure_self = destructure(quote! { self }, "a", lhs_obj);
            let destructure_rhs = destructure(quote! { r }, "b", rhs_obj);
            let return_expr = construct(output_object, &expressions);

            quote! {
                impl < T: Ring > #op_trait < #rhs_type_name > for #lhs_type_name {
                    type Output = #output_type_name;

                    #[allow(unused_variables)]
                    fn #op_fn (self, r: #rhs_type_name) -> #output_type_name {
                        #destructure_self
                        #destructure_rhs
                        #return_expr
                    }
                }
            }
        })
        .collect()
}

fn gen_algebra(input: Input) -> Result<TokenStream> {
    let Input { items } = input;

    let mut basis = None;
    let mut metric_mac = None;
    let mut blades_mac = None;
    let mut structs = vec![];
    let mut passthrough = vec![];

    for item in items.into_iter() {
        match item {
            Item::Macro(item_macro) if item_macro.mac.path.is_ident("basis") => {
                basis = Some(parse_basis(&item_macro.mac)?);
            }
            Item::Macro(item_macro) if item_macro.mac.path.is_ident("metric") => {
                metric_mac = Some(item_macro.mac);
            }
            Item::Macro(item_macro) if item_macro.mac.path.is_ident("blades") => {
                blades_mac = Some(item_macro.mac);
            }
            Item::Struct(item_struct)
                if item_struct.attrs.iter().any(|a| a.path().is_ident("multivector")) =>
            {
                structs.push(item_struct);
            }
            other => passthrough.push(other),
        }
    }

    let Some((prefix, basis_chars)) = basis else {
        return Err(Error::new(Span::call_site(), "missing basis![] declaration"));
    };
    let dimension = basis_chars.len();
    let metric = match metric_mac {
        Some(mac) => parse_metric(&mac, dimension)?,
        None => return Err(Error::new(Span::call_site(), "missing metric![] declaration")),
    };
    let Some(blades_mac) = blades_mac else {
        return Err(Error::new(Span::call_site(), "missing blades![] declaration"));
    };

    let mut algebra = Algebra {
        prefix,
        basis_chars,
        metric,
        blades: vec![],
        blade_names: vec![],
    };

    // The blades![] list fixes the global blade index of every basis element
    let blade_names: Vec<Ident> = blades_mac
        .parse_body_with(Punctuated::<Ident, Token![,]>::parse_terminated)?
        .into_iter()
        .collect();
    for name in blade_names.iter() {
        let (blade, sign) = algebra.parse_blade_name(&name.to_string());
        if sign != 1 {
            return Err(Error::new_spanned(
                name,
                "blades![] entries must list their basis vectors in basis order",
            ));
        }
        if algebra.blades.contains(&blade) {
            return Err(Error::new_spanned(name, "blade listed twice"));
        }
        algebra.blades.push(blade);
    }
    if algebra.blades.len() != 1 << dimension {
        return Err(Error::new_spanned(
            &blades_mac.tokens,
            format!("blades![] must list all {} basis elements", 1 << dimension),
        ));
    }
    algebra.blade_names = blade_names;
    let blade_count = algebra.blades.len();

    // Generate multiplication table for the basis elements.
    // Each entry is a list of (coefficient, blade_index) pairs;
    // a non-diagonal metric can produce more than one output blade,
    // e.g. e0 * ei = e0i - 1
    let multiplication_table: Vec<Vec<Vec<(isize, usize)>>> = {
        let mut cache = HashMap::new();
        let mut table = vec![];
        for i in 0..blade_count {
            let mut row = vec![];
            for j in 0..blade_count {
                let product = mul_blades(&algebra.metric, &algebra.blades[i], &algebra.blades[j], &mut cache);
                let entry = product
                    .into_iter()
                    .map(|(blade, coef)| {
                        let ix = algebra
                            .blade_index(&blade)
                            .ok_or_else(|| Error::new_spanned(&blades_mac.tokens, "product blade missing from blades![]"))?;
                        Ok((coef, ix))
                    })
                    .collect::<Result<Vec<_>>>()?;
                row.push(entry);
            }
            table.push(row);
        }
        table
    };

    let scalar_ix = algebra
        .blade_index(&[])
        .ok_or_else(|| Error::new_spanned(&blades_mac.tokens, "blades![] must include the scalar"))?;

    let mut objects: Vec<Object> = vec![Object {
        name: Ident::new("T", Span::call_site()),
        fields: vec![Field {
            ident: Ident::new("scalar", Span::call_site()),
            blade: scalar_ix,
            sign: 1,
        }],
        is_scalar: true,
        is_versor: false,
    }];

    let mut struct_code = TokenStream::new();
    for mut item_struct in structs.into_iter() {
        let is_versor = item_struct.attrs.iter().any(|a| a.path().is_ident("versor"));
        item_struct
            .attrs
            .retain(|a| !a.path().is_ident("multivector") && !a.path().is_ident("versor"));
        let fields = object_fields(&algebra, &item_struct)?;
        objects.push(Object {
            name: item_struct.ident.clone(),
            fields,
            is_scalar: false,
            is_versor,
        });
        item_struct.to_tokens(&mut struct_code);
    }

    let blades_module = gen_blades_module(&algebra);

    let impl_code: TokenStream = objects
        .iter()
        .map(|obj| gen_object_impls(&algebra, &multiplication_table, &objects, obj))
        .collect();

    let passthrough_code: TokenStream = passthrough.iter().map(|i| i.to_token_stream()).collect();

    Ok(quote! {
        #blades_module
        #struct_code
        #passthrough_code
        #impl_code
    })
}

fn object_fields(algebra: &Algebra, item_struct: &ItemStruct) -> Result<Vec<Field>> {
    let Fields::Named(named) = &item_struct.fields else {
        return Err(Error::new_spanned(item_struct, "multivector structs must have named fields"));
    };
    let mut fields: Vec<Field> = vec![];
    for f in named.named.iter() {
        let Some(ident) = f.ident.clone() else {
            return Err(Error::new_spanned(f, "multivector fields must be named"));
        };
        let (blade, sign) = algebra.parse_blade_name(&ident.to_string());
        let Some(ix) = algebra.blade_index(&blade) else {
            return Err(Error::new_spanned(&ident, "field does not name a blade of the algebra"));
        };
        if fields.iter().any(|other| other.blade == ix) {
            return Err(Error::new_spanned(&ident, "two fields name the same blade"));
        }
        fields.push(Field { ident, blade: ix, sign });
    }
    Ok(fields)
}

fn gen_blades_module(algebra: &Algebra) -> TokenStream {
    let count = algebra.blades.len();
    let constants: TokenStream = algebra
        .blade_names
        .iter()
        .enumerate()
        .map(|(ix, name)| {
            let constant = Ident::new(&name.to_string().to_uppercase(), Span::call_site());
            quote! { pub const #constant: usize = #ix; }
        })
        .collect();
    let grades: Vec<usize> = (0..count).map(|ix| algebra.grade(ix)).collect();
    let names: Vec<String> = algebra.blade_names.iter().map(|n| n.to_string()).collect();
    quote! {
        /// Global blade indices and their grades
        pub mod blades {
            #constants

            /// Number of basis blades in the algebra
            pub const COUNT: usize = #count;

            /// Grade of each blade, by index
            pub const GRADES: [usize; #count] = [#(#grades),*];

            /// Name of each blade, by index
            pub const NAMES: [&str; #count] = [#(#names),*];
        }
    }
}

fn gen_object_impls(
    algebra: &Algebra,
    table: &[Vec<Vec<(isize, usize)>>],
    objects: &[Object],
    obj: &Object,
) -> TokenStream {
    if obj.is_scalar {
        return quote! {};
    }
    let blade_count = algebra.blades.len();

    let geometric = |a: &Object, b: &Object| {
        symbolic_product(
            algebra,
            table,
            &symbolic_object(algebra, a, "a"),
            &symbolic_object(algebra, b, "b"),
            |_, _, _| true,
        )
    };

    // Select grade |s - t|
    let inner = |a: &Object, b: &Object| {
        symbolic_product(
            algebra,
            table,
            &symbolic_object(algebra, a, "a"),
            &symbolic_object(algebra, b, "b"),
            |s, t, u| s + u == t || t + u == s,
        )
    };

    // Select grade s + t
    let outer = |a: &Object, b: &Object| {
        symbolic_product(
            algebra,
            table,
            &symbolic_object(algebra, a, "a"),
            &symbolic_object(algebra, b, "b"),
            |s, t, u| s + t == u,
        )
    };

    // ½(AB - BA); every surviving coefficient is even
    let commutator = |a: &Object, b: &Object| {
        let sa = symbolic_object(algebra, a, "a");
        let sb = symbolic_object(algebra, b, "b");
        let ab = symbolic_product(algebra, table, &sa, &sb, |_, _, _| true);
        let ba = symbolic_product(algebra, table, &sb, &sa, |_, _, _| true);
        symbolic_sum(ab, ba, -1)
            .into_iter()
            .map(|expr| {
                SymbolicSumExpr(
                    expr.0
                        .into_iter()
                        .map(|SymbolicProdExpr(coef, symbols)| {
                            assert!(coef % 2 == 0, "commutator coefficient was odd");
                            SymbolicProdExpr(coef / 2, symbols)
                        })
                        .collect(),
                )
            })
            .collect()
    };

    let sum = |a: &Object, b: &Object| {
        symbolic_sum(symbolic_object(algebra, a, "a"), symbolic_object(algebra, b, "b"), 1)
    };
    let difference = |a: &Object, b: &Object| {
        symbolic_sum(symbolic_object(algebra, a, "a"), symbolic_object(algebra, b, "b"), -1)
    };

    let geometric_product_code = gen_binary_operator(
        objects,
        quote! { core::ops::Mul },
        Ident::new("mul", Span::call_site()),
        obj,
        geometric,
    );
    let inner_product_code = gen_binary_operator(
        objects,
        quote! { core::ops::BitOr },
        Ident::new("bitor", Span::call_site()),
        obj,
        inner,
    );
    let outer_product_code = gen_binary_operator(
        objects,
        quote! { core::ops::BitXor },
        Ident::new("bitxor", Span::call_site()),
        obj,
        outer,
    );
    let commutator_code = gen_binary_operator(
        objects,
        quote! { Commutator },
        Ident::new("commutator", Span::call_site()),
        obj,
        commutator,
    );
    let add_code = gen_binary_operator(
        objects,
        quote! { core::ops::Add },
        Ident::new("add", Span::call_site()),
        obj,
        sum,
    );
    let sub_code = gen_binary_operator(
        objects,
        quote! { core::ops::Sub },
        Ident::new("sub", Span::call_site()),
        obj,
        difference,
    );

    let type_name = obj.type_name();
    let type_name_colons = obj.type_name_colons();
    let field_idents: Vec<&Ident> = obj.fields.iter().map(|f| &f.ident).collect();
    let size = obj.fields.len();
    let blade_indices: Vec<usize> = obj.fields.iter().map(|f| f.blade).collect();

    let get_arms: TokenStream = obj
        .fields
        .iter()
        .map(|f| {
            let ident = &f.ident;
            let ix = f.blade;
            if f.sign < 0 {
                quote! { #ix => -self.#ident, }
            } else {
                quote! { #ix => self.#ident, }
            }
        })
        .collect();

    let grade_fields: TokenStream = obj
        .fields
        .iter()
        .map(|f| {
            let ident = &f.ident;
            let grade = algebra.grade(f.blade);
            quote! { #ident: if grade == #grade { self.#ident } else { T::zero() }, }
        })
        .collect();

    let inherent_code = quote! {
        impl<T: Ring> #type_name {
            /// Global index of the blade stored in each field, in field order
            pub const BLADES: [usize; #size] = [#(#blade_indices),*];

            /// Number of stored coefficients
            pub const SIZE: usize = #size;

            pub fn blades() -> &'static [usize] {
                &[#(#blade_indices),*]
            }

            /// The stored coefficients in field order
            pub fn vector(&self) -> [T; #size] {
                [#(self.#field_idents),*]
            }

            pub fn from_vector(values: [T; #size]) -> Self {
                let [#(#field_idents),*] = values;
                #type_name_colons { #(#field_idents),* }
            }

            /// The coefficient on the given blade, or zero if it is not stored
            pub fn get(&self, blade: usize) -> T {
                match blade {
                    #get_arms
                    _ => T::zero(),
                }
            }

            pub fn zero() -> Self {
                #type_name_colons { #(#field_idents: T::zero()),* }
            }

            /// Keep only the coefficients of the given grade
            pub fn grade_part(&self, grade: usize) -> Self {
                #type_name_colons { #grade_fields }
            }
        }
    };

    let coefficients_code = quote! {
        impl<T: Ring> Coefficients<T> for #type_name {
            const BLADE_INDICES: &'static [usize] = &[#(#blade_indices),*];

            fn coefficient(&self, i: usize) -> T {
                match Self::BLADE_INDICES.get(i) {
                    Some(&blade) => self.get(blade),
                    None => T::zero(),
                }
            }
        }
    };

    let neg_code = quote! {
        impl<T: Ring> core::ops::Neg for #type_name {
            type Output = #type_name;
            fn neg(self) -> #type_name {
                #type_name_colons { #(#field_idents: -self.#field_idents),* }
            }
        }

        impl<T: Ring> core::ops::AddAssign<#type_name> for #type_name {
            fn add_assign(&mut self, r: #type_name) {
                #(self.#field_idents = self.#field_idents + r.#field_idents;)*
            }
        }

        impl<T: Ring> core::ops::SubAssign<#type_name> for #type_name {
            fn sub_assign(&mut self, r: #type_name) {
                #(self.#field_idents = self.#field_idents - r.#field_idents;)*
            }
        }

        impl<T: Ring> core::ops::MulAssign<T> for #type_name {
            fn mul_assign(&mut self, r: T) {
                #(self.#field_idents = self.#field_idents * r;)*
            }
        }
    };

    let reverse_fields: TokenStream = obj
        .fields
        .iter()
        .map(|f| {
            let ident = &f.ident;
            if algebra.reverse_sign(f.blade) < 0 {
                quote! { #ident: -self.#ident, }
            } else {
                quote! { #ident: self.#ident, }
            }
        })
        .collect();
    let reverse_code = quote! {
        impl<T: Ring> Reverse for #type_name {
            fn reverse(self) -> #type_name {
                #type_name_colons { #reverse_fields }
            }
        }
    };

    // The dual is right multiplication by the pseudoscalar
    let dual_code = if let Some(pseudoscalar_ix) = algebra.pseudoscalar_index() {
        let mut pseudoscalar: SymbolicMultivector = vec![Default::default(); blade_count];
        pseudoscalar[pseudoscalar_ix] = SymbolicSumExpr(vec![SymbolicProdExpr(1, vec![])]);
        let expressions = symbolic_product(
            algebra,
            table,
            &symbolic_object(algebra, obj, "a"),
            &pseudoscalar,
            |_, _, _| true,
        );
        match select_output(objects, &expressions) {
            Some(output_object) => {
                let output_type_name = output_object.type_name();
                let destructure_self = destructure(quote! { self }, "a", obj);
                let return_expr = construct(output_object, &expressions);
                quote! {
                    impl<T: Ring> Dual for #type_name {
                        type Output = #output_type_name;
                        fn dual(self) -> #output_type_name {
                            #destructure_self
                            #return_expr
                        }
                    }
                }
            }
            None => quote! {},
        }
    } else {
        quote! {}
    };

    // Scalar part of X * reverse(X)
    let squared_norm_code = {
        let sx = symbolic_object(algebra, obj, "a");
        let expressions = symbolic_product(
            algebra,
            table,
            &sx,
            &symbolic_reverse(algebra, sx.clone()),
            |_, _, u| u == 0,
        );
        let expr = &expressions[objects[0].fields[0].blade];
        let destructure_self = destructure(quote! { self }, "a", obj);
        quote! {
            impl<T: Ring> SquaredNorm<T> for #type_name {
                #[allow(unused_variables)]
                fn squared_norm(self) -> T {
                    #destructure_self
                    #expr
                }
            }
        }
    };

    // Sandwich product V X Ṽ, projected back onto X
    let transform_code: TokenStream = if obj.is_versor {
        objects
            .iter()
            .filter(|x| !x.is_scalar && !x.is_full(blade_count))
            .map(|x| {
                let v = symbolic_object(algebra, obj, "a");
                let v_reverse = symbolic_reverse(algebra, v.clone());
                let vx = symbolic_product(algebra, table, &v, &symbolic_object(algebra, x, "b"), |_, _, _| true);
                let expressions = symbolic_product(algebra, table, &vx, &v_reverse, |_, _, _| true);
                let x_type_name = x.type_name();
                let destructure_self = destructure(quote! { self }, "a", obj);
                let destructure_rhs = destructure(quote! { r }, "b", x);
                let return_expr = construct(x, &expressions);
                quote! {
                    impl<T: Ring> Transform<#x_type_name> for #type_name {
                        #[allow(unused_variables)]
                        fn transform(self, r: #x_type_name) -> #x_type_name {
                            #destructure_self
                            #destructure_rhs
                            #return_expr
                        }
                    }
                }
            })
            .collect()
    } else {
        quote! {}
    };

    // Projection onto every other object, and lossless conversions into supersets
    let conversion_code: TokenStream = objects
        .iter()
        .filter(|target| !target.is_same(obj))
        .map(|target| {
            let expressions = symbolic_object(algebra, obj, "a");
            let destructure_self = destructure(quote! { self }, "a", obj);
            let target_type_name = target.type_name();
            let return_expr = construct(target, &expressions);
            if target.is_scalar {
                return quote! {};
            }
            let project = quote! {
                impl<T: Ring> Project<#target_type_name> for #type_name {
                    #[allow(unused_variables)]
                    fn project(self) -> #target_type_name {
                        #destructure_self
                        #return_expr
                    }
                }
            };
            let from = if obj.is_subset_of(target) {
                let destructure_value = destructure(quote! { value }, "a", obj);
                quote! {
                    impl<T: Ring> From<#type_name> for #target_type_name {
                        fn from(value: #type_name) -> #target_type_name {
                            #destructure_value
                            #return_expr
                        }
                    }
                }
            } else {
                quote! {}
            };
            quote! {
                #project
                #from
            }
        })
        .collect();

    let from_scalar_code = if obj.has_blade(objects[0].fields[0].blade) {
        let mut expressions: SymbolicMultivector = vec![Default::default(); blade_count];
        expressions[objects[0].fields[0].blade] = SymbolicSumExpr(vec![SymbolicProdExpr(
            1,
            vec![coefficient_symbol("a", &objects[0].fields[0].ident)],
        )]);
        let return_expr = construct(obj, &expressions);
        quote! {
            impl<T: Ring> From<T> for #type_name {
                fn from(a_scalar: T) -> #type_name {
                    #return_expr
                }
            }
        }
    } else {
        quote! {}
    };

    quote! {
        #inherent_code
        #coefficients_code
        #neg_code
        #reverse_code
        #dual_code
        #squared_norm_code
        #transform_code
        #conversion_code
        #from_scalar_code
        #geometric_product_code
        #inner_product_code
        #outer_product_code
        #commutator_code
        #add_code
        #sub_code
    }
}

/// Generate a geometric algebra over the given structs.
///
/// ```ignore
/// geometric_algebra! {
///     basis![e0, e1, e2, e3, ei];
///     metric![
///         [0, 0, 0, 0, -1],
///         [0, 1, 0, 0, 0],
///         [0, 0, 1, 0, 0],
///         [0, 0, 0, 1, 0],
///         [-1, 0, 0, 0, 0],
///     ];
///     blades![scalar, e1, e2, e3, ei, e0, /* ... every blade ... */];
///
///     #[multivector]
///     #[versor]
///     #[derive(Clone, Copy, Debug, Default, PartialEq)]
///     pub struct Rotor<T> {
///         pub scalar: T,
///         pub e23: T,
///         pub e13: T,
///         pub e12: T,
///     }
/// }
/// ```
///
/// The traits `Ring`, `Reverse`, `Dual`, `SquaredNorm`, `Commutator`, `Transform`,
/// `Project` and `Coefficients` must be in scope at the invocation site.
/// The output type of each operation is the first declared struct
/// that can hold every blade of the result.
#[proc_macro]
pub fn geometric_algebra(input_tokens: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input_tokens as Input);

    match gen_algebra(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conformal_metric() -> Vec<Vec<isize>> {
        // basis order e0, e1, e2, e3, ei
        vec![
            vec![0, 0, 0, 0, -1],
            vec![0, 1, 0, 0, 0],
            vec![0, 0, 1, 0, 0],
            vec![0, 0, 0, 1, 0],
            vec![-1, 0, 0, 0, 0],
        ]
    }

    fn product(a: &[usize], b: &[usize]) -> BladeSum {
        mul_blades(&conformal_metric(), a, b, &mut HashMap::new())
    }

    #[test]
    fn null_basis_products() {
        // e0 ei = e0i - 1
        let p = product(&[0], &[4]);
        assert_eq!(p.get(&vec![0, 4]), Some(&1));
        assert_eq!(p.get(&vec![]), Some(&-1));

        // e0i e0i = 1
        let p = product(&[0, 4], &[0, 4]);
        assert_eq!(p.len(), 1);
        assert_eq!(p.get(&vec![]), Some(&1));

        // e0 e0 = 0
        assert!(product(&[0], &[0]).is_empty());
    }

    #[test]
    fn euclidean_products() {
        // e12 e12 = -1
        let p = product(&[1, 2], &[1, 2]);
        assert_eq!(p.get(&vec![]), Some(&-1));

        // e2 e1 = -e12
        let p = product(&[2], &[1]);
        assert_eq!(p.get(&vec![1, 2]), Some(&-1));
    }

    #[test]
    fn pseudoscalar_squares_to_minus_one() {
        let p = product(&[0, 1, 2, 3, 4], &[0, 1, 2, 3, 4]);
        assert_eq!(p.len(), 1);
        assert_eq!(p.get(&vec![]), Some(&-1));
    }
}
